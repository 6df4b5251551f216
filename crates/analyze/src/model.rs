use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One merged institution: a rank and a price, either possibly absent.
/// Records missing a dimension drop out of that dimension's population
/// instead of poisoning it.
#[derive(Debug, Clone)]
pub struct Record {
    pub institution: String,
    pub country: String,
    pub rank: Option<f64>,
    pub price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Percentiles and value score for one record within one population
/// (global or a country subgroup). A `None` means the record lacked the
/// dimension, or the population was too small to rank it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scores {
    pub rank_percentile: Option<f64>,
    pub price_percentile: Option<f64>,
    pub value_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRow {
    pub institution: String,
    pub country: String,
    pub rank: Option<f64>,
    pub price: Option<f64>,
    pub global: Scores,
    pub within_country: Scores,
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Price-vs-rank correlation for one population. Both coefficients come
/// with two-sided p-values from the t distribution on n − 2 degrees of
/// freedom.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationEntry {
    pub group: String,
    pub n: usize,
    pub pearson_r: f64,
    pub pearson_p: f64,
    pub spearman_rho: f64,
    pub spearman_p: f64,
}

/// A population whose statistic was omitted, and why — surfaced so the
/// report never shows a spuriously confident number.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedGroup {
    pub group: String,
    pub statistic: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Sweet spot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SweetSpotEntry {
    pub institution: String,
    pub country: String,
    pub rank: f64,
    pub price: f64,
    pub value_score: f64,
}

/// High-rank/low-price outliers extracted from the scored table.
#[derive(Debug, Clone, Serialize)]
pub struct SweetSpotReport {
    /// Top N by global value score.
    pub top_value: Vec<SweetSpotEntry>,
    /// Rank in the best rank quartile AND price at or below the 60th
    /// price percentile.
    pub elite_bargains: Vec<SweetSpotEntry>,
    /// Price in the cheapest quartile AND rank at or below the 70th
    /// rank percentile.
    pub budget_champions: Vec<SweetSpotEntry>,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeMeta {
    pub engine_version: String,
    pub w_rank: f64,
    pub w_price: f64,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResult {
    pub meta: AnalyzeMeta,
    pub scored: Vec<ScoredRow>,
    pub correlations: Vec<CorrelationEntry>,
    pub skipped: Vec<SkippedGroup>,
    pub sweet_spot: SweetSpotReport,
}
