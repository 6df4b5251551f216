//! `unirank fetch` — pull data from external sources into canonical CSV.

mod arwu;
mod common;
mod reference;
mod scorecard;
mod ukfees;

pub use ukfees::FeeBasis;

use std::path::PathBuf;

use clap::Subcommand;

use crate::CliError;

#[derive(Subcommand)]
pub enum FetchCommands {
    /// Fetch ARWU world rankings (falls back to the built-in table)
    #[command(after_help = "\
Examples:
  unirank fetch arwu --out arwu.csv
  unirank fetch arwu --year 2023 --max-pages 5 --out arwu.csv
  unirank fetch arwu --offline --out arwu.csv")]
    Arwu {
        /// Ranking year
        #[arg(long, default_value_t = 2023)]
        year: u32,

        /// Output CSV file path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip the network and emit the built-in reference table
        #[arg(long)]
        offline: bool,

        /// Pages to fetch (100 institutions per page)
        #[arg(long)]
        max_pages: Option<u32>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Fetch US tuition data from the College Scorecard API
    #[command(after_help = "\
Examples:
  unirank fetch scorecard --out scorecard.csv
  unirank fetch scorecard --api-key abc123 --min-students 5000 --out scorecard.csv
  SCORECARD_API_KEY=abc123 unirank fetch scorecard --out scorecard.csv")]
    Scorecard {
        /// api.data.gov key (default: SCORECARD_API_KEY env)
        #[arg(long)]
        api_key: Option<String>,

        /// Minimum enrolled students
        #[arg(long, default_value_t = 1000)]
        min_students: u32,

        /// Pages to fetch (100 schools per page)
        #[arg(long)]
        max_pages: Option<u32>,

        /// Output CSV file path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Emit the curated UK fee table
    #[command(after_help = "\
Examples:
  unirank fetch ukfees --out uk.csv
  unirank fetch ukfees --basis home --out uk.csv")]
    Ukfees {
        /// Which fee column becomes the price
        #[arg(long, value_enum, default_value_t = ukfees::FeeBasis::International)]
        basis: ukfees::FeeBasis,

        /// Output CSV file path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

pub fn cmd_fetch(command: FetchCommands) -> Result<(), CliError> {
    match command {
        FetchCommands::Arwu { year, out, offline, max_pages, quiet } => {
            arwu::cmd_fetch_arwu(year, out, offline, max_pages, quiet)
        }
        FetchCommands::Scorecard { api_key, min_students, max_pages, out, quiet } => {
            scorecard::cmd_fetch_scorecard(api_key, min_students, max_pages, out, quiet)
        }
        FetchCommands::Ukfees { basis, out, quiet } => {
            ukfees::cmd_fetch_ukfees(basis, out, quiet)
        }
    }
}
