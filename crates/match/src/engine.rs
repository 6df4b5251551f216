use std::collections::BTreeMap;

use crate::assign::resolve;
use crate::canon::Canonicalizer;
use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::model::{
    MatchMeta, MatchResult, MatchSummary, MergedRow, SourceRow, SourceTable, UnmatchedReason,
    UnmatchedRecord,
};
use crate::similarity::similarity_matrix;

/// Run the full match per config: canonicalize both sides, score, solve
/// the one-to-one assignment, merge the accepted pairs. Returns merged
/// rows plus the audit trail of rejected records on both sides.
///
/// Partial data is fine: the engine matches whatever fraction of the
/// two tables it receives. Only structurally invalid input (handled at
/// load time) is fatal.
pub fn run(config: &MatchConfig, left: &SourceTable, right: &SourceTable) -> MatchResult {
    let canon = Canonicalizer::new(&config.canonical);

    let left_canon: Vec<String> =
        left.rows.iter().map(|r| canon.canonical(&r.raw_name)).collect();
    let right_canon: Vec<String> =
        right.rows.iter().map(|r| canon.canonical(&r.raw_name)).collect();

    let matrix = similarity_matrix(&left_canon, &right_canon);
    let outcome = resolve(&matrix, &config.thresholds);

    let merged: Vec<MergedRow> = outcome
        .pairs
        .iter()
        .map(|pair| merge_pair(&left.rows[pair.left], &right.rows[pair.right], pair.similarity))
        .collect();

    // The resolver only sees scores; names that canonicalized to
    // nothing look like plain zero rows to it. Restore the sharper
    // reason so the audit trail says why the record never competed.
    let left_unmatched: Vec<UnmatchedRecord> = outcome
        .left_unmatched
        .iter()
        .map(|u| {
            let row = &left.rows[u.index];
            let reason = if left_canon[u.index].is_empty() {
                UnmatchedReason::UnmatchableName
            } else {
                u.reason
            };
            unmatched_record(row, reason)
        })
        .collect();
    let right_unmatched: Vec<UnmatchedRecord> = outcome
        .right_unmatched
        .iter()
        .map(|u| {
            let row = &right.rows[u.index];
            let reason = if right_canon[u.index].is_empty() {
                UnmatchedReason::UnmatchableName
            } else {
                u.reason
            };
            unmatched_record(row, reason)
        })
        .collect();

    MatchResult {
        meta: MatchMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            min_similarity: config.thresholds.min_similarity,
            min_gap: config.thresholds.min_gap,
        },
        summary: MatchSummary {
            left_total: left.rows.len(),
            right_total: right.rows.len(),
            matched: merged.len(),
            left_unmatched: left_unmatched.len(),
            right_unmatched: right_unmatched.len(),
        },
        merged,
        left_unmatched,
        right_unmatched,
    }
}

/// Union of both sides' metrics; the left side wins on key collision
/// and supplies the display name.
fn merge_pair(left: &SourceRow, right: &SourceRow, similarity: f64) -> MergedRow {
    let mut metrics = right.metrics.clone();
    for (k, v) in &left.metrics {
        metrics.insert(k.clone(), *v);
    }
    let country = if !left.country.is_empty() {
        left.country.clone()
    } else {
        right.country.clone()
    };
    MergedRow {
        institution: left.raw_name.clone(),
        country,
        left_source: left.source.clone(),
        left_record_id: left.record_id.clone(),
        right_source: right.source.clone(),
        right_record_id: right.record_id.clone(),
        metrics,
        match_confidence: similarity,
    }
}

fn unmatched_record(row: &SourceRow, reason: UnmatchedReason) -> UnmatchedRecord {
    UnmatchedRecord {
        source: row.source.clone(),
        record_id: row.record_id.clone(),
        raw_name: row.raw_name.clone(),
        reason,
    }
}

/// Load one side's CSV into SourceRows, applying its column mapping.
/// A missing mapped column is fatal; a blank metric cell is a null and
/// the metric is simply absent from that row.
pub fn load_csv_rows(
    side_name: &str,
    csv_data: &str,
    side: &crate::config::SideConfig,
) -> Result<Vec<SourceRow>, MatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| MatchError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, MatchError> {
        headers.iter().position(|h| h == name).ok_or_else(|| MatchError::MissingColumn {
            side: side_name.into(),
            column: name.into(),
        })
    };

    let col = &side.columns;
    let record_id_idx = idx(&col.record_id)?;
    let name_idx = idx(&col.name)?;
    let country_idx = match &col.country {
        Some(c) => Some(idx(c)?),
        None => None,
    };
    let metric_idx: Vec<(String, usize)> = col
        .metrics
        .iter()
        .map(|(metric, column)| Ok((metric.clone(), idx(column)?)))
        .collect::<Result<_, MatchError>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MatchError::Io(e.to_string()))?;
        let record_id = record.get(record_id_idx).unwrap_or("").to_string();
        let raw_name = record.get(name_idx).unwrap_or("").to_string();
        let country = country_idx
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();

        let mut metrics = BTreeMap::new();
        for (metric, i) in &metric_idx {
            let cell = record.get(*i).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| MatchError::MetricParse {
                side: side_name.into(),
                record_id: record_id.clone(),
                column: metric.clone(),
                value: cell.into(),
            })?;
            metrics.insert(metric.clone(), value);
        }

        rows.push(SourceRow {
            source: side.source.clone(),
            record_id,
            raw_name,
            country,
            metrics,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CanonicalConfig, ColumnMapping, SideConfig, ThresholdConfig};

    fn side(source: &str) -> SideConfig {
        SideConfig {
            source: source.into(),
            file: format!("{source}.csv"),
            columns: ColumnMapping {
                record_id: "record_id".into(),
                name: "name".into(),
                country: Some("country".into()),
                metrics: [("rank".to_string(), "rank".to_string())].into(),
            },
        }
    }

    fn config() -> MatchConfig {
        MatchConfig {
            name: "test".into(),
            left: side("arwu"),
            right: side("scorecard"),
            thresholds: ThresholdConfig::default(),
            canonical: CanonicalConfig::default(),
            output: Default::default(),
        }
    }

    fn row(source: &str, id: &str, name: &str, metric: Option<(&str, f64)>) -> SourceRow {
        SourceRow {
            source: source.into(),
            record_id: id.into(),
            raw_name: name.into(),
            country: String::new(),
            metrics: metric.map(|(k, v)| (k.to_string(), v)).into_iter().collect(),
        }
    }

    #[test]
    fn load_csv_basic() {
        let csv = "\
record_id,name,country,rank
arwu_1,Harvard University,United States,1
arwu_2,Stanford University,United States,2
arwu_3,University of Cambridge,United Kingdom,
";
        let rows = load_csv_rows("left", csv, &side("arwu")).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].raw_name, "Harvard University");
        assert_eq!(rows[0].metrics["rank"], 1.0);
        assert_eq!(rows[2].country, "United Kingdom");
        // Blank metric cell is a null, not a zero.
        assert!(rows[2].metrics.get("rank").is_none());
    }

    #[test]
    fn load_csv_missing_column_is_fatal() {
        let csv = "record_id,name\na,b\n";
        let err = load_csv_rows("left", csv, &side("arwu")).unwrap_err();
        assert!(matches!(err, MatchError::MissingColumn { .. }));
        assert!(err.to_string().contains("country"));
    }

    #[test]
    fn load_csv_bad_metric_is_fatal() {
        let csv = "\
record_id,name,country,rank
arwu_1,Harvard University,US,first
";
        let err = load_csv_rows("left", csv, &side("arwu")).unwrap_err();
        assert!(err.to_string().contains("'first'"));
    }

    #[test]
    fn merged_rows_union_metrics_left_wins() {
        let config = config();
        let left = SourceTable {
            source: "arwu".into(),
            rows: vec![row("arwu", "a1", "Harvard University", Some(("rank", 1.0)))],
        };
        let mut right_row = row("scorecard", "s1", "Harvard Univ.", Some(("price", 54269.0)));
        right_row.metrics.insert("rank".into(), 999.0); // collides; left must win
        let right = SourceTable { source: "scorecard".into(), rows: vec![right_row] };

        let result = run(&config, &left, &right);
        assert_eq!(result.summary.matched, 1);
        let merged = &result.merged[0];
        assert_eq!(merged.institution, "Harvard University");
        assert_eq!(merged.metrics["rank"], 1.0);
        assert_eq!(merged.metrics["price"], 54269.0);
        assert!(merged.match_confidence >= 90.0);
    }

    #[test]
    fn unmatchable_names_reported_not_compared() {
        // Two names that both canonicalize to nothing must never match
        // each other, and must be reported with the sharper reason.
        let config = config();
        let left = SourceTable {
            source: "arwu".into(),
            rows: vec![
                row("arwu", "a1", "University", None),
                row("arwu", "a2", "Harvard University", Some(("rank", 1.0))),
            ],
        };
        let right = SourceTable {
            source: "scorecard".into(),
            rows: vec![
                row("scorecard", "s1", "The State University", None),
                row("scorecard", "s2", "Harvard University", None),
            ],
        };
        let result = run(&config, &left, &right);
        assert_eq!(result.summary.matched, 1);
        assert_eq!(result.merged[0].left_record_id, "a2");
        assert_eq!(result.left_unmatched.len(), 1);
        assert_eq!(result.left_unmatched[0].reason, UnmatchedReason::UnmatchableName);
        assert_eq!(result.right_unmatched.len(), 1);
        assert_eq!(result.right_unmatched[0].reason, UnmatchedReason::UnmatchableName);
    }

    #[test]
    fn partial_data_still_matches() {
        // One side far smaller than the other: the engine proceeds on
        // what it has instead of waiting for complete tables.
        let config = config();
        let left = SourceTable {
            source: "arwu".into(),
            rows: vec![row("arwu", "a1", "Yale University", Some(("rank", 10.0)))],
        };
        let right = SourceTable {
            source: "scorecard".into(),
            rows: vec![
                row("scorecard", "s1", "Yale University", None),
                row("scorecard", "s2", "Cornell University", None),
                row("scorecard", "s3", "Rice University", None),
            ],
        };
        let result = run(&config, &left, &right);
        assert_eq!(result.summary.matched, 1);
        assert_eq!(result.summary.right_unmatched, 2);
    }
}
