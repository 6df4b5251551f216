//! Shared infrastructure for `unirank fetch` adapters.
//!
//! Each adapter (arwu, scorecard, ukfees) reuses:
//! - `FetchClient` — HTTP client with retry / backoff / error classification
//! - `UniversityRow` — the 7-column CSV schema all adapters emit
//! - `resolve_api_key` — flag > env > error
//! - `write_csv` — open output, write header + rows, flush
//!
//! # UniversityRow Contract
//!
//! Every fetch adapter MUST produce rows conforming to this contract;
//! the matcher's column mappings depend on it.
//!
//! ## Columns (in order)
//!
//! | # | Column      | Type  | Required | Description                         |
//! |---|-------------|-------|----------|-------------------------------------|
//! | 1 | `source`    | text  | Yes      | Adapter name (arwu, scorecard, …)   |
//! | 2 | `record_id` | text  | Yes      | Unique ID within the source         |
//! | 3 | `name`      | text  | Yes      | Free-text institution name, as-is   |
//! | 4 | `country`   | text  | No       | Country or region label             |
//! | 5 | `rank`      | f64   | No       | Ranking position (1 = best)         |
//! | 6 | `score`     | f64   | No       | Source-specific quality score       |
//! | 7 | `price`     | f64   | No       | Annual tuition, source currency→USD |
//!
//! ## Invariants
//!
//! - **Column order**: fixed, serialized by `serde` in struct field order.
//! - **Sort order**: deterministic per adapter (rank, then record_id).
//!   Two runs over the same data produce byte-identical CSV.
//! - **Optional columns**: empty string when absent. Never a zero —
//!   a missing tuition is a null, not a free education.
//! - **Names**: emitted verbatim from the source. Canonicalization is
//!   the matcher's job; the fetch layer must not pre-normalize.

use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

pub(super) const MAX_RETRIES: u32 = 3;
pub(super) const USER_AGENT: &str = concat!("unirank/", env!("CARGO_PKG_VERSION"));

/// Fixed pause between paginated requests. Crude but sufficient rate
/// limiting for APIs this tool touches a few times per run.
pub(super) const PAGE_DELAY_MS: u64 = 600;

// ── Canonical CSV row ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(super) struct UniversityRow {
    pub source: String,
    pub record_id: String,
    pub name: String,
    pub country: String,
    pub rank: Option<f64>,
    pub score: Option<f64>,
    pub price: Option<f64>,
}

/// Deterministic adapter output order: rank first, ties by record_id.
pub(super) fn sort_rows(rows: &mut [UniversityRow]) {
    rows.sort_by(|a, b| {
        let ar = a.rank.unwrap_or(f64::MAX);
        let br = b.rank.unwrap_or(f64::MAX);
        ar.partial_cmp(&br)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });
}

// ── FetchClient ─────────────────────────────────────────────────────

/// Shared HTTP client that handles retry, backoff, and error
/// classification.
///
/// Adapters own their URL, auth, and query params; they pass a
/// request-building closure to [`request_with_retry`] which runs the
/// retry loop and maps HTTP status codes to the standard exit codes.
pub(super) struct FetchClient {
    http: reqwest::blocking::Client,
    source_name: String,
    error_extractor: fn(&serde_json::Value, u16) -> String,
}

impl FetchClient {
    pub(super) fn new(
        source_name: &str,
        error_extractor: fn(&serde_json::Value, u16) -> String,
    ) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError {
                code: exit_codes::EXIT_ERROR,
                message: format!("failed to build HTTP client: {e}"),
                hint: None,
            })?;

        Ok(Self {
            http,
            source_name: source_name.to_string(),
            error_extractor,
        })
    }

    /// Make a GET request with retry + exponential backoff.
    ///
    /// `build_request` is called once per attempt. Auth failures
    /// (401/403) and other 4xx fail immediately; 429 and 5xx retry with
    /// doubling backoff, honoring Retry-After when present.
    pub(super) fn request_with_retry(
        &self,
        build_request: impl Fn(&reqwest::blocking::Client) -> reqwest::blocking::RequestBuilder,
    ) -> Result<serde_json::Value, CliError> {
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let result = build_request(&self.http).send();

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    // Auth errors: fail immediately
                    if status == 401 || status == 403 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_AUTH,
                            message: format!(
                                "{} auth failed ({}): {}",
                                self.source_name, status, msg,
                            ),
                            hint: None,
                        });
                    }

                    // Bad request: fail immediately
                    if status == 400 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_VALIDATION,
                            message: format!(
                                "{} request rejected ({}): {}",
                                self.source_name, status, msg,
                            ),
                            hint: None,
                        });
                    }

                    // Other 4xx (not 429): fail immediately
                    if status >= 400 && status < 500 && status != 429 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        let msg = (self.error_extractor)(&body, status);
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_UPSTREAM,
                            message: format!(
                                "{} error ({}): {}",
                                self.source_name, status, msg,
                            ),
                            hint: None,
                        });
                    }

                    // Retryable: 429, 5xx
                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            let exit_code = if status == 429 {
                                exit_codes::EXIT_FETCH_RATE_LIMIT
                            } else {
                                exit_codes::EXIT_FETCH_UPSTREAM
                            };
                            return Err(CliError {
                                code: exit_code,
                                message: format!(
                                    "{} {} after {} attempts ({})",
                                    self.source_name,
                                    if status == 429 {
                                        "rate limited"
                                    } else {
                                        "upstream error"
                                    },
                                    MAX_RETRIES,
                                    status,
                                ),
                                hint: None,
                            });
                        }

                        // Respect Retry-After header for 429
                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };

                        eprintln!(
                            "warning: retry {}/{} in {}s (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            wait,
                            status,
                        );
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    // Success: parse JSON
                    let body: serde_json::Value = resp.json().map_err(|e| CliError {
                        code: exit_codes::EXIT_FETCH_UPSTREAM,
                        message: format!(
                            "failed to parse {} JSON response: {}",
                            self.source_name, e,
                        ),
                        hint: None,
                    })?;

                    return Ok(body);
                }
                Err(e) => {
                    // Network/timeout errors: retry
                    if attempt == MAX_RETRIES {
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_UPSTREAM,
                            message: format!(
                                "{} upstream error after {} attempts: {}",
                                self.source_name, MAX_RETRIES, e,
                            ),
                            hint: None,
                        });
                    }

                    eprintln!(
                        "warning: retry {}/{} in {}s ({})",
                        attempt + 1,
                        MAX_RETRIES,
                        backoff_secs,
                        e,
                    );
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

/// Resolve an API key: flag value > environment variable > error.
pub(super) fn resolve_api_key(
    flag: Option<String>,
    source_name: &str,
    env_var: &str,
) -> Result<String, CliError> {
    if let Some(key) = flag {
        let trimmed = key.trim().to_string();
        if trimmed.is_empty() {
            return Err(CliError {
                code: exit_codes::EXIT_FETCH_NOT_AUTH,
                message: format!(
                    "missing {} API key (use --api-key or set {})",
                    source_name, env_var,
                ),
                hint: None,
            });
        }
        return Ok(trimmed);
    }

    if let Ok(key) = std::env::var(env_var) {
        let trimmed = key.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    Err(CliError {
        code: exit_codes::EXIT_FETCH_NOT_AUTH,
        message: format!(
            "missing {} API key (use --api-key or set {})",
            source_name, env_var,
        ),
        hint: None,
    })
}

/// Write canonical rows to CSV (file or stdout). Returns the output
/// label for use in progress messages.
pub(super) fn write_csv(
    rows: &[UniversityRow],
    out: &Option<PathBuf>,
) -> Result<String, CliError> {
    let out_label = out
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    let writer: Box<dyn Write> = match out {
        Some(path) => {
            let f = std::fs::File::create(path).map_err(|e| {
                CliError::io(format!("cannot create {}: {}", path.display(), e))
            })?;
            Box::new(std::io::BufWriter::new(f))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout().lock())),
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    // Always write the header, even with zero rows
    if rows.is_empty() {
        csv_writer
            .write_record([
                "source", "record_id", "name", "country", "rank", "score", "price",
            ])
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))?;

    Ok(out_label)
}

pub(super) fn page_delay() {
    thread::sleep(Duration::from_millis(PAGE_DELAY_MS));
}

// ── Tests ───────────────────────────────────────────────────────────
