//! `unirank fetch ukfees` — UK tuition fees and domestic rankings.
//!
//! No public fee API exists; this adapter emits the curated 2024 fee
//! table directly. Prices are converted to USD so they sit on the same
//! scale as Scorecard tuition.

use std::path::PathBuf;

use crate::CliError;

use super::common::{self, UniversityRow};
use super::reference::{GBP_TO_USD, UK_FEES_2024};

/// Which fee column becomes the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeeBasis {
    /// International student tuition (comparable with US out-of-state).
    International,
    /// Home student tuition (capped; Scottish schools far lower).
    Home,
}

impl std::fmt::Display for FeeBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::International => write!(f, "international"),
            Self::Home => write!(f, "home"),
        }
    }
}

pub fn rows(basis: FeeBasis) -> Vec<UniversityRow> {
    let mut rows: Vec<UniversityRow> = UK_FEES_2024
        .iter()
        .enumerate()
        .map(|(i, (name, home_gbp, intl_gbp, cug_rank, _guardian_rank))| {
            let gbp = match basis {
                FeeBasis::International => *intl_gbp,
                FeeBasis::Home => *home_gbp,
            };
            UniversityRow {
                source: "ukfees".into(),
                record_id: format!("uk_{i}"),
                name: name.to_string(),
                country: "United Kingdom".into(),
                rank: Some(*cug_rank as f64),
                score: None,
                price: Some((gbp as f64 * GBP_TO_USD).round()),
            }
        })
        .collect();
    common::sort_rows(&mut rows);
    rows
}

pub fn cmd_fetch_ukfees(
    basis: FeeBasis,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let rows = rows(basis);
    let out_label = common::write_csv(&rows, &out)?;
    if !quiet {
        eprintln!("Wrote {} rows to {}", rows.len(), out_label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_prices_in_usd() {
        let rows = rows(FeeBasis::International);
        let cambridge = rows.iter().find(|r| r.name == "University of Cambridge").unwrap();
        assert_eq!(cambridge.price, Some((27048.0 * GBP_TO_USD).round()));
        assert_eq!(cambridge.rank, Some(1.0));
    }

    #[test]
    fn home_basis_shows_the_scottish_discount() {
        let rows = rows(FeeBasis::Home);
        let edinburgh = rows.iter().find(|r| r.name == "University of Edinburgh").unwrap();
        let oxford = rows.iter().find(|r| r.name == "University of Oxford").unwrap();
        assert!(edinburgh.price.unwrap() < oxford.price.unwrap() / 4.0);
    }

    #[test]
    fn sorted_by_rank() {
        let rows = rows(FeeBasis::International);
        for pair in rows.windows(2) {
            assert!(pair[0].rank.unwrap() <= pair[1].rank.unwrap());
        }
    }
}
