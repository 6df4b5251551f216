//! Hand-curated reference tables used when a live source is down or
//! `--offline` is passed. Values were transcribed from the published
//! 2023 ARWU table and 2024 UK fee schedules; they go stale, they do
//! not break.

/// (institution, rank, score) — ARWU 2023, the entries reliable enough
/// for strict matching. Sparse above rank 100 on purpose: ARWU reports
/// banded ranks (101, 151, …) there.
pub const ARWU_2023: &[(&str, u32, f64)] = &[
    ("Harvard University", 1, 100.0),
    ("Stanford University", 2, 76.3),
    ("Massachusetts Institute of Technology", 3, 75.4),
    ("University of California, Berkeley", 4, 68.9),
    ("University of Cambridge", 5, 67.2),
    ("Princeton University", 6, 66.7),
    ("Columbia University", 7, 60.4),
    ("California Institute of Technology", 8, 59.5),
    ("University of Chicago", 9, 56.5),
    ("Yale University", 10, 54.1),
    ("Cornell University", 11, 52.8),
    ("University of California, Los Angeles", 12, 51.9),
    ("University of Pennsylvania", 13, 48.4),
    ("Johns Hopkins University", 14, 47.8),
    ("University of California, San Francisco", 15, 46.2),
    ("University of Oxford", 16, 45.4),
    ("University of Michigan, Ann Arbor", 17, 44.9),
    ("University College London", 18, 43.2),
    ("University of California, San Diego", 19, 42.1),
    ("University of Washington", 20, 41.8),
    ("New York University", 22, 40.2),
    ("Imperial College London", 23, 39.8),
    ("Northwestern University", 24, 39.1),
    ("University of Wisconsin - Madison", 25, 38.7),
    ("University of Illinois at Urbana-Champaign", 27, 37.9),
    ("Duke University", 28, 37.5),
    ("University of North Carolina at Chapel Hill", 32, 35.9),
    ("King's College London", 33, 35.6),
    ("University of Colorado at Boulder", 34, 35.2),
    ("Carnegie Mellon University", 35, 34.8),
    ("University of Edinburgh", 36, 34.5),
    ("University of Texas at Austin", 38, 33.8),
    ("Boston University", 40, 33.2),
    ("University of Manchester", 41, 32.9),
    ("University of California, Davis", 42, 32.5),
    ("University of California, Santa Barbara", 43, 32.2),
    ("University of Southern California", 46, 31.2),
    ("University of California, Irvine", 48, 30.6),
    ("University of Bristol", 51, 29.1),
    ("Ohio State University", 52, 28.8),
    ("University of Pittsburgh", 53, 28.5),
    ("Rice University", 61, 26.1),
    ("Arizona State University", 63, 25.5),
    ("Pennsylvania State University", 65, 24.9),
    ("University of Virginia", 66, 24.6),
    ("Purdue University", 68, 24.0),
    ("University of California, Riverside", 69, 23.7),
    ("Georgia Institute of Technology", 72, 22.8),
    ("Michigan State University", 73, 22.5),
    ("University of Iowa", 75, 21.9),
    ("London School of Economics and Political Science", 76, 24.3),
    ("University of Glasgow", 101, 21.2),
    ("University of Birmingham", 151, 18.5),
    ("University of Leeds", 151, 18.4),
    ("University of Liverpool", 151, 18.1),
    ("University of Nottingham", 151, 18.0),
    ("University of Sheffield", 151, 17.9),
    ("University of Southampton", 151, 17.8),
];

/// (institution, home tuition GBP, international tuition GBP, CUG rank,
/// Guardian rank) — 2024 fee schedules. Home fees are capped at £9,250
/// in England/Wales; Scottish institutions charge home students £1,820.
pub const UK_FEES_2024: &[(&str, u32, u32, u32, u32)] = &[
    ("University of Cambridge", 9250, 27048, 1, 1),
    ("University of Oxford", 9250, 28950, 2, 2),
    ("London School of Economics", 9250, 25608, 3, 4),
    ("Imperial College London", 9250, 37900, 4, 5),
    ("University College London", 9250, 31200, 5, 8),
    ("University of Edinburgh", 1820, 26500, 6, 13),
    ("Kings College London", 9250, 31350, 7, 35),
    ("University of Manchester", 9250, 26000, 8, 25),
    ("University of Warwick", 9250, 27060, 9, 9),
    ("University of Bristol", 9250, 27200, 10, 15),
    ("University of Glasgow", 1820, 24540, 11, 18),
    ("Durham University", 9250, 28500, 12, 6),
    ("University of Sheffield", 9250, 23650, 13, 26),
    ("University of Birmingham", 9250, 25860, 14, 14),
    ("University of Leeds", 9250, 24500, 15, 19),
    ("University of Nottingham", 9250, 26000, 16, 30),
    ("University of Southampton", 9250, 24400, 17, 20),
    ("University of York", 9250, 24450, 18, 16),
    ("Newcastle University", 9250, 24000, 19, 33),
    ("University of Liverpool", 9250, 23400, 20, 42),
    ("Lancaster University", 9250, 25040, 21, 7),
    ("University of Bath", 9250, 25900, 22, 11),
    ("University of East Anglia", 9250, 22800, 23, 23),
    ("University of Exeter", 9250, 27000, 24, 12),
    ("Cardiff University", 9000, 24450, 25, 34),
    ("University of Leicester", 9250, 21750, 26, 41),
    ("University of Surrey", 9250, 23800, 27, 38),
    ("University of Strathclyde", 1820, 22400, 28, 22),
    ("Queen Mary University", 9250, 26250, 29, 47),
    ("University of Reading", 9250, 22350, 30, 29),
    ("Coventry University", 9250, 16800, 50, 52),
    ("University of Chester", 9250, 13450, 68, 75),
    ("University of Cumbria", 9250, 13575, 89, 95),
    ("Teesside University", 9250, 15000, 95, 89),
    ("University of Bolton", 9250, 12950, 120, 110),
    ("University of St Andrews", 1820, 30160, 3, 3),
    ("University of Aberdeen", 1820, 24800, 31, 48),
    ("University of Stirling", 1820, 16400, 45, 45),
    ("Glasgow Caledonian University", 1820, 15500, 78, 82),
    ("Robert Gordon University", 1820, 17000, 55, 71),
];

/// Rough GBP→USD conversion applied to UK international fees so prices
/// compare against US tuition on one scale.
pub const GBP_TO_USD: f64 = 1.27;
