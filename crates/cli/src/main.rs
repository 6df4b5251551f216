// unirank CLI - university rank/price reconciliation

mod analyzecmd;
mod exit_codes;
mod fetch;
mod matchcmd;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_ERROR;

#[derive(Parser)]
#[command(name = "unirank")]
#[command(about = "Collect, match, and analyze university ranking and tuition data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull data from an external source into canonical CSV
    #[command(subcommand)]
    Fetch(fetch::FetchCommands),

    /// Match institutions across two sources
    #[command(subcommand)]
    Match(matchcmd::MatchCommands),

    /// Score a merged rank+price table and summarize correlations
    #[command(after_help = "\
Examples:
  unirank analyze merged.csv
  unirank analyze merged.csv --weights 0.7,0.3 --top 10
  unirank analyze merged.csv --json --output scored.csv")]
    Analyze {
        /// Merged CSV produced by `unirank match run`
        input: std::path::PathBuf,

        /// Rank/price blend weights, comma separated, must sum to 1
        #[arg(long, default_value = "0.6,0.4")]
        weights: String,

        /// Column carrying the numeric rank
        #[arg(long, default_value = "rank")]
        rank_column: String,

        /// Column carrying the numeric price
        #[arg(long, default_value = "price")]
        price_column: String,

        /// Entries per sweet-spot list
        #[arg(long, default_value_t = 15)]
        top: usize,

        /// Write the scored table to this CSV file
        #[arg(long)]
        output: Option<std::path::PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress the human report on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

/// Error type carried by every command: an exit code from the registry,
/// a message, and an optional remediation hint.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch(cmd) => fetch::cmd_fetch(cmd),
        Commands::Match(cmd) => matchcmd::cmd_match(cmd),
        Commands::Analyze {
            input,
            weights,
            rank_column,
            price_column,
            top,
            output,
            json,
            quiet,
        } => analyzecmd::cmd_analyze(
            input,
            &weights,
            &rank_column,
            &price_column,
            top,
            output,
            json,
            quiet,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = &err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}
