//! `unirank match` — config-driven cross-source institution matching.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use unirank_match::engine::{load_csv_rows, run};
use unirank_match::model::{MatchResult, UnmatchedRecord};
use unirank_match::{MatchConfig, SourceTable};

use crate::exit_codes::{EXIT_MATCH_EMPTY, EXIT_MATCH_INVALID_CONFIG, EXIT_MATCH_RUNTIME};
use crate::CliError;

/// Unmatched records shown per side before truncating the audit list.
const UNMATCHED_PREVIEW: usize = 15;

#[derive(Subcommand)]
pub enum MatchCommands {
    /// Run a match from a TOML config file
    #[command(after_help = "\
Examples:
  unirank match run match.toml --out merged.csv
  unirank match run match.toml --json
  unirank match run match.toml --output result.json --quiet")]
    Run {
        /// Path to the match config file
        config: PathBuf,

        /// Write the merged CSV here (default: [output].merged_csv from
        /// the config, else stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the full result as JSON to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a match config without running
    #[command(after_help = "\
Examples:
  unirank match validate match.toml")]
    Validate {
        /// Path to the match config file
        config: PathBuf,
    },
}

pub fn cmd_match(cmd: MatchCommands) -> Result<(), CliError> {
    match cmd {
        MatchCommands::Run { config, out, json, output, quiet } => {
            cmd_match_run(config, out, json, output, quiet)
        }
        MatchCommands::Validate { config } => cmd_match_validate(config),
    }
}

fn match_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn cmd_match_run(
    config_path: PathBuf,
    out: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| match_err(EXIT_MATCH_INVALID_CONFIG, e.to_string()))?;

    // Resolve data files relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let left = load_side(base_dir, "left", &config.left)?;
    let right = load_side(base_dir, "right", &config.right)?;

    let result = run(&config, &left, &right);

    // Merged CSV: --out flag > config [output] > stdout.
    let merged_out = out.or_else(|| config.output.merged_csv.as_ref().map(PathBuf::from));
    write_merged_csv(&result, &merged_out)?;

    if let Some(ref path) = output_file {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("JSON serialization error: {e}")))?;
        std::fs::write(path, &json_str)
            .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("cannot write output: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if !quiet {
        print_summary(&result);
    }

    if result.merged.is_empty() {
        return Err(match_err(EXIT_MATCH_EMPTY, "no pairs cleared the confidence thresholds"));
    }
    Ok(())
}

fn load_side(
    base_dir: &Path,
    side_name: &str,
    side: &unirank_match::config::SideConfig,
) -> Result<SourceTable, CliError> {
    let csv_path = base_dir.join(&side.file);
    let csv_data = std::fs::read_to_string(&csv_path).map_err(|e| {
        match_err(EXIT_MATCH_RUNTIME, format!("cannot read {}: {e}", csv_path.display()))
    })?;
    let rows = load_csv_rows(side_name, &csv_data, side)
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, e.to_string()))?;
    Ok(SourceTable { source: side.source.clone(), rows })
}

/// Merged CSV schema: identity columns, the union of metric names in
/// sorted order, then match_confidence. Column set is stable for a run;
/// rows missing a metric leave the cell blank.
fn write_merged_csv(result: &MatchResult, out: &Option<PathBuf>) -> Result<(), CliError> {
    let metric_names: BTreeSet<&str> = result
        .merged
        .iter()
        .flat_map(|m| m.metrics.keys().map(String::as_str))
        .collect();

    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path).map_err(
            |e| match_err(EXIT_MATCH_RUNTIME, format!("cannot create {}: {e}", path.display())),
        )?)),
        None => Box::new(std::io::BufWriter::new(std::io::stdout().lock())),
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut header = vec![
        "institution",
        "country",
        "left_source",
        "left_record_id",
        "right_source",
        "right_record_id",
    ];
    header.extend(metric_names.iter().copied());
    header.push("match_confidence");
    csv_writer
        .write_record(&header)
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("CSV write error: {e}")))?;

    for m in &result.merged {
        let mut record = vec![
            m.institution.clone(),
            m.country.clone(),
            m.left_source.clone(),
            m.left_record_id.clone(),
            m.right_source.clone(),
            m.right_record_id.clone(),
        ];
        for name in &metric_names {
            record.push(
                m.metrics
                    .get(*name)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        record.push(format!("{:.1}", m.match_confidence));
        csv_writer
            .write_record(&record)
            .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("CSV write error: {e}")))?;
    }

    csv_writer
        .flush()
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("CSV flush error: {e}")))?;
    Ok(())
}

fn print_summary(result: &MatchResult) {
    let s = &result.summary;
    eprintln!(
        "match '{}': {} x {} records — {} matched, {} + {} unmatched (min_similarity {}, min_gap {})",
        result.meta.config_name,
        s.left_total,
        s.right_total,
        s.matched,
        s.left_unmatched,
        s.right_unmatched,
        result.meta.min_similarity,
        result.meta.min_gap,
    );
    print_unmatched("left", &result.left_unmatched);
    print_unmatched("right", &result.right_unmatched);
}

/// The unmatched sets exist for manual review; list them rather than
/// burying them in a count.
fn print_unmatched(side: &str, unmatched: &[UnmatchedRecord]) {
    for u in unmatched.iter().take(UNMATCHED_PREVIEW) {
        eprintln!("  unmatched {side}: {} ({}) — {}", u.raw_name, u.record_id, u.reason);
    }
    if unmatched.len() > UNMATCHED_PREVIEW {
        eprintln!("  … and {} more on the {side} side", unmatched.len() - UNMATCHED_PREVIEW);
    }
}

fn cmd_match_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("cannot read config: {e}")))?;
    match MatchConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' matching {} against {} (min_similarity {}, min_gap {})",
                config.name,
                config.left.source,
                config.right.source,
                config.thresholds.min_similarity,
                config.thresholds.min_gap,
            );
            Ok(())
        }
        Err(e) => Err(match_err(EXIT_MATCH_INVALID_CONFIG, e.to_string())),
    }
}
