//! `unirank fetch scorecard` — US College Scorecard tuition data.
//!
//! REST API with an api.data.gov key. Rows without any tuition figure
//! are skipped (counted, reported); out-of-state tuition is preferred
//! as the price so US and international numbers compare.

use std::path::PathBuf;

use crate::CliError;

use super::common::{self, FetchClient, UniversityRow};

// ── Constants ───────────────────────────────────────────────────────

const SCORECARD_API_BASE: &str = "https://api.data.gov";
const SCORECARD_PATH: &str = "/ed/collegescorecard/v1/schools";
const PER_PAGE: u32 = 100;
const DEFAULT_MAX_PAGES: u32 = 20;

const FIELDS: &[&str] = &[
    "id",
    "school.name",
    "school.state",
    "latest.cost.tuition.in_state",
    "latest.cost.tuition.out_of_state",
    "latest.student.size",
];

// ── Scorecard client ────────────────────────────────────────────────

pub struct ScorecardClient {
    client: FetchClient,
    base_url: String,
    api_key: String,
}

#[derive(Debug)]
pub struct ScorecardFetch {
    pub rows: Vec<UniversityRow>,
    pub skipped_no_tuition: usize,
}

impl ScorecardClient {
    pub fn new(api_key: String) -> Result<Self, CliError> {
        Self::with_base_url(api_key, SCORECARD_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, CliError> {
        Ok(Self {
            client: FetchClient::new("Scorecard", extract_error)?,
            base_url,
            api_key,
        })
    }

    /// Page through operating bachelor's/graduate institutions with at
    /// least `min_students` enrolled. Stops at the first empty page.
    pub fn fetch_schools(
        &self,
        min_students: u32,
        max_pages: u32,
        quiet: bool,
    ) -> Result<ScorecardFetch, CliError> {
        let mut rows: Vec<UniversityRow> = Vec::new();
        let mut skipped_no_tuition = 0usize;

        for page in 0..max_pages {
            let url = format!("{}{}", self.base_url, SCORECARD_PATH);
            let page_str = page.to_string();
            let per_page_str = PER_PAGE.to_string();
            let size_range = format!("{min_students}..");
            let fields = FIELDS.join(",");

            let body = self.client.request_with_retry(|http| {
                http.get(&url).query(&[
                    ("api_key", self.api_key.as_str()),
                    ("fields", fields.as_str()),
                    ("school.degrees_awarded.predominant", "3,4"),
                    ("school.operating", "1"),
                    ("latest.student.size__range", size_range.as_str()),
                    ("per_page", per_page_str.as_str()),
                    ("page", page_str.as_str()),
                ])
            })?;

            let results = match body.get("results").and_then(|r| r.as_array()) {
                Some(results) if !results.is_empty() => results.clone(),
                _ => break,
            };

            for school in &results {
                match parse_school(school) {
                    Some(row) => rows.push(row),
                    None => skipped_no_tuition += 1,
                }
            }

            if !quiet {
                eprintln!(
                    "Scorecard page {}: {} schools (total: {}, skipped: {})",
                    page + 1,
                    results.len(),
                    rows.len(),
                    skipped_no_tuition,
                );
            }

            if results.len() < PER_PAGE as usize {
                break;
            }
            common::page_delay();
        }

        common::sort_rows(&mut rows);
        Ok(ScorecardFetch { rows, skipped_no_tuition })
    }
}

/// One school record. Returns None when the school carries no tuition
/// figure at all — a price-less row cannot feed the price analysis.
fn parse_school(school: &serde_json::Value) -> Option<UniversityRow> {
    let name = school.get("school.name")?.as_str()?;
    let in_state = school
        .get("latest.cost.tuition.in_state")
        .and_then(|v| v.as_f64());
    let out_of_state = school
        .get("latest.cost.tuition.out_of_state")
        .and_then(|v| v.as_f64());
    let price = out_of_state.or(in_state)?;

    let id = school
        .get("id")
        .map(|v| v.to_string().trim_matches('"').to_string())
        .unwrap_or_default();

    Some(UniversityRow {
        source: "scorecard".into(),
        record_id: format!("sc_{id}"),
        name: name.to_string(),
        country: "United States".into(),
        rank: None,
        score: None,
        price: Some(price),
    })
}

fn extract_error(body: &serde_json::Value, status: u16) -> String {
    // api.data.gov wraps errors as {"error": {"code": ..., "message": ...}}
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

// ── Main command ────────────────────────────────────────────────────

pub fn cmd_fetch_scorecard(
    api_key: Option<String>,
    min_students: u32,
    max_pages: Option<u32>,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let api_key = common::resolve_api_key(api_key, "Scorecard", "SCORECARD_API_KEY")?;
    let client = ScorecardClient::new(api_key)?;
    let fetch = client.fetch_schools(min_students, max_pages.unwrap_or(DEFAULT_MAX_PAGES), quiet)?;

    let out_label = common::write_csv(&fetch.rows, &out)?;
    if !quiet {
        eprintln!(
            "Wrote {} rows to {} ({} schools skipped: no tuition data)",
            fetch.rows.len(),
            out_label,
            fetch.skipped_no_tuition,
        );
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
