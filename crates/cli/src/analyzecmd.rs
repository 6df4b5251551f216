//! `unirank analyze` — score a merged table, summarize correlations,
//! surface the sweet spot.

use std::io::Write;
use std::path::PathBuf;

use unirank_analyze::model::{AnalyzeResult, SweetSpotEntry};
use unirank_analyze::{load_csv_records, run, AnalyzeOptions, Weights};

use crate::exit_codes::{EXIT_ANALYZE_INPUT, EXIT_ANALYZE_RUNTIME, EXIT_ANALYZE_WEIGHTS};
use crate::CliError;

pub fn cmd_analyze(
    input: PathBuf,
    weights: &str,
    rank_column: &str,
    price_column: &str,
    top: usize,
    output: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let weights = parse_weights(weights)?;

    let csv_data = std::fs::read_to_string(&input).map_err(|e| CliError {
        code: EXIT_ANALYZE_RUNTIME,
        message: format!("cannot read {}: {e}", input.display()),
        hint: None,
    })?;
    let records = load_csv_records(&csv_data, rank_column, price_column).map_err(|e| CliError {
        code: EXIT_ANALYZE_INPUT,
        message: e.to_string(),
        hint: Some("expected a merged CSV from `unirank match run`".into()),
    })?;

    let options = AnalyzeOptions { weights, top_n: top };
    let result = run(&records, &options).map_err(|e| CliError {
        code: EXIT_ANALYZE_WEIGHTS,
        message: e.to_string(),
        hint: None,
    })?;

    if let Some(ref path) = output {
        write_scored_csv(&result, path)?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: EXIT_ANALYZE_RUNTIME,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    }

    if !quiet {
        print_report(&result);
    }

    Ok(())
}

/// Parse "0.6,0.4" into Weights. Validation of the values themselves
/// happens in the engine.
fn parse_weights(s: &str) -> Result<Weights, CliError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(CliError {
            code: EXIT_ANALYZE_WEIGHTS,
            message: format!("expected two comma-separated weights, got '{s}'"),
            hint: Some("example: --weights 0.6,0.4".into()),
        });
    }
    let parse = |p: &str| -> Result<f64, CliError> {
        p.parse().map_err(|_| CliError {
            code: EXIT_ANALYZE_WEIGHTS,
            message: format!("cannot parse weight '{p}'"),
            hint: None,
        })
    };
    Ok(Weights { rank: parse(parts[0])?, price: parse(parts[1])? })
}

fn write_scored_csv(result: &AnalyzeResult, path: &PathBuf) -> Result<(), CliError> {
    let io_err = |e: String| CliError {
        code: EXIT_ANALYZE_RUNTIME,
        message: e,
        hint: None,
    };

    let f = std::fs::File::create(path)
        .map_err(|e| io_err(format!("cannot create {}: {e}", path.display())))?;
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(std::io::BufWriter::new(f));

    csv_writer
        .write_record([
            "institution",
            "country",
            "rank",
            "price",
            "rank_percentile",
            "price_percentile",
            "value_score",
            "country_rank_percentile",
            "country_price_percentile",
            "country_value_score",
        ])
        .map_err(|e| io_err(format!("CSV write error: {e}")))?;

    let fmt = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
    for s in &result.scored {
        csv_writer
            .write_record([
                s.institution.clone(),
                s.country.clone(),
                s.rank.map(|v| v.to_string()).unwrap_or_default(),
                s.price.map(|v| v.to_string()).unwrap_or_default(),
                fmt(s.global.rank_percentile),
                fmt(s.global.price_percentile),
                fmt(s.global.value_score),
                fmt(s.within_country.rank_percentile),
                fmt(s.within_country.price_percentile),
                fmt(s.within_country.value_score),
            ])
            .map_err(|e| io_err(format!("CSV write error: {e}")))?;
    }
    csv_writer
        .flush()
        .map_err(|e| io_err(format!("CSV flush error: {e}")))?;
    Ok(())
}

fn print_report(result: &AnalyzeResult) {
    let err = std::io::stderr();
    let mut out = err.lock();
    let _ = write_report(&mut out, result);
}

fn write_report(out: &mut impl Write, result: &AnalyzeResult) -> std::io::Result<()> {
    writeln!(
        out,
        "analyzed {} records (weights: rank {}, price {})",
        result.meta.records, result.meta.w_rank, result.meta.w_price,
    )?;

    writeln!(out, "\ncorrelation (price vs rank):")?;
    for c in &result.correlations {
        writeln!(
            out,
            "  {:<12} n={:<4} pearson r={:+.3} (p={:.3e})  spearman rho={:+.3} (p={:.3e})",
            c.group, c.n, c.pearson_r, c.pearson_p, c.spearman_rho, c.spearman_p,
        )?;
    }
    for s in &result.skipped {
        writeln!(out, "  {:<12} {} skipped: {}", s.group, s.statistic, s.reason)?;
    }

    let list = |out: &mut dyn Write, title: &str, entries: &[SweetSpotEntry]| -> std::io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(out, "\n{title}:")?;
        for e in entries {
            writeln!(
                out,
                "  {:<45} {:<15} rank {:>5}  ${:>8.0}  score {:>5.1}",
                e.institution, e.country, e.rank, e.price, e.value_score,
            )?;
        }
        Ok(())
    };

    list(out, "top value", &result.sweet_spot.top_value)?;
    list(out, "elite bargains (top rank quartile, moderate price)", &result.sweet_spot.elite_bargains)?;
    list(out, "budget champions (cheapest quartile, solid rank)", &result.sweet_spot.budget_champions)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_weights_ok() {
        let w = parse_weights("0.7, 0.3").unwrap();
        assert_eq!(w.rank, 0.7);
        assert_eq!(w.price, 0.3);
    }

    #[test]
    fn parse_weights_rejects_garbage() {
        assert!(parse_weights("0.6").is_err());
        assert!(parse_weights("a,b").is_err());
        assert!(parse_weights("0.6,0.2,0.2").is_err());
    }
}
