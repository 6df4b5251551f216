//! `unirank fetch arwu` — Academic Ranking of World Universities.
//!
//! Live source: the shanghairanking JSON endpoint, paginated. When the
//! endpoint fails (the site reshuffles its API every so often) the
//! adapter degrades to the built-in ARWU 2023 reference table with a
//! warning rather than leaving the pipeline without a ranking side.

use std::path::PathBuf;

use crate::exit_codes;
use crate::CliError;

use super::common::{self, FetchClient, UniversityRow};
use super::reference;

// ── Constants ───────────────────────────────────────────────────────

const ARWU_API_BASE: &str = "https://www.shanghairanking.com";
const PER_PAGE: u32 = 100;
const DEFAULT_MAX_PAGES: u32 = 10;

// ── ARWU client ─────────────────────────────────────────────────────

pub struct ArwuClient {
    client: FetchClient,
    base_url: String,
    year: u32,
}

impl ArwuClient {
    pub fn new(year: u32) -> Result<Self, CliError> {
        Self::with_base_url(year, ARWU_API_BASE.to_string())
    }

    pub fn with_base_url(year: u32, base_url: String) -> Result<Self, CliError> {
        Ok(Self {
            client: FetchClient::new("ARWU", extract_error)?,
            base_url,
            year,
        })
    }

    /// Fetch up to `max_pages` pages of rankings. Pages that fail to
    /// produce the expected JSON shape abort the whole fetch — a partial
    /// ranking table would silently skew every downstream percentile.
    pub fn fetch_rankings(
        &self,
        max_pages: u32,
        quiet: bool,
    ) -> Result<Vec<UniversityRow>, CliError> {
        let mut rows: Vec<UniversityRow> = Vec::new();

        for page in 0..max_pages {
            let url = format!(
                "{}/rankings/arwu/{}?page={}&per-page={}",
                self.base_url, self.year, page, PER_PAGE
            );

            let body = self.client.request_with_retry(|http| {
                http.get(&url)
                    .header("Accept", "application/json")
                    .header(
                        "Referer",
                        format!("{}/rankings/arwu/{}", self.base_url, self.year),
                    )
            })?;

            let data = body.get("data").and_then(|d| d.as_array()).ok_or_else(|| CliError {
                code: exit_codes::EXIT_FETCH_UPSTREAM,
                message: format!("ARWU page {page}: response has no 'data' array"),
                hint: Some("the endpoint shape changed; use --offline for the reference table".into()),
            })?;

            if data.is_empty() {
                break;
            }

            for item in data {
                if let Some(row) = parse_ranking_item(item) {
                    rows.push(row);
                }
            }

            if !quiet {
                eprintln!("ARWU page {}: {} institutions (total: {})", page + 1, data.len(), rows.len());
            }

            if data.len() < PER_PAGE as usize {
                break;
            }
            common::page_delay();
        }

        common::sort_rows(&mut rows);
        Ok(rows)
    }
}

/// One ranking entry. Field names have drifted across site versions;
/// accept the spellings observed so far. Entries without a usable name
/// and rank are dropped.
fn parse_ranking_item(item: &serde_json::Value) -> Option<UniversityRow> {
    let name = ["univNameEn", "institution", "Institution"]
        .iter()
        .find_map(|k| item.get(*k).and_then(|v| v.as_str()))?;
    let rank = ["ranking", "rank", "Rank"]
        .iter()
        .find_map(|k| parse_banded_rank(item.get(*k)?))?;
    let country = ["region", "country", "CountryRegion"]
        .iter()
        .find_map(|k| item.get(*k).and_then(|v| v.as_str()))
        .unwrap_or("");
    let score = ["score", "totalScore", "Score"]
        .iter()
        .find_map(|k| item.get(*k).and_then(|v| v.as_f64()));

    Some(UniversityRow {
        source: "arwu".into(),
        record_id: format!("arwu_{}", rank as u32),
        name: name.to_string(),
        country: country.to_string(),
        rank: Some(rank),
        score,
        price: None,
    })
}

/// Ranks above 100 are published as bands ("101-150"); take the band
/// floor so ordering survives.
fn parse_banded_rank(value: &serde_json::Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let s = value.as_str()?;
    let first = s.split('-').next()?.trim();
    first.parse().ok()
}

fn extract_error(body: &serde_json::Value, status: u16) -> String {
    body.get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

// ── Reference fallback ──────────────────────────────────────────────

pub fn reference_rows() -> Vec<UniversityRow> {
    let mut rows: Vec<UniversityRow> = reference::ARWU_2023
        .iter()
        .enumerate()
        .map(|(i, (name, rank, score))| UniversityRow {
            source: "arwu".into(),
            // Banded ranks repeat; index the id so record_ids stay unique.
            record_id: format!("arwu_ref_{i}"),
            name: name.to_string(),
            country: country_of(name).into(),
            rank: Some(*rank as f64),
            score: Some(*score),
            price: None,
        })
        .collect();
    common::sort_rows(&mut rows);
    rows
}

/// The reference table only spans two countries; everything not in the
/// UK list is a US institution.
fn country_of(name: &str) -> &'static str {
    const UK: &[&str] = &[
        "University of Cambridge",
        "University of Oxford",
        "University College London",
        "Imperial College London",
        "King's College London",
        "University of Edinburgh",
        "University of Manchester",
        "University of Bristol",
        "London School of Economics and Political Science",
        "University of Glasgow",
        "University of Birmingham",
        "University of Leeds",
        "University of Liverpool",
        "University of Nottingham",
        "University of Sheffield",
        "University of Southampton",
    ];
    if UK.contains(&name) {
        "United Kingdom"
    } else {
        "United States"
    }
}

// ── Main command ────────────────────────────────────────────────────

pub fn cmd_fetch_arwu(
    year: u32,
    out: Option<PathBuf>,
    offline: bool,
    max_pages: Option<u32>,
    quiet: bool,
) -> Result<(), CliError> {
    let rows = if offline {
        if !quiet {
            eprintln!("ARWU: using built-in 2023 reference table (--offline)");
        }
        reference_rows()
    } else {
        let client = ArwuClient::new(year)?;
        match client.fetch_rankings(max_pages.unwrap_or(DEFAULT_MAX_PAGES), quiet) {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                eprintln!("warning: ARWU endpoint returned no rows; degrading to the built-in reference table");
                reference_rows()
            }
            Err(err) => {
                eprintln!("warning: ARWU fetch failed ({}); degrading to the built-in reference table", err.message);
                reference_rows()
            }
        }
    };

    let out_label = common::write_csv(&rows, &out)?;
    if !quiet {
        eprintln!("Wrote {} rows to {}", rows.len(), out_label);
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
