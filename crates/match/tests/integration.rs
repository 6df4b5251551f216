use std::path::PathBuf;

use unirank_match::config::MatchConfig;
use unirank_match::engine::{load_csv_rows, run};
use unirank_match::model::{SourceTable, UnmatchedReason};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

const CONFIG: &str = r#"
name = "ARWU vs Scorecard"

[left]
source = "arwu"
file = "arwu.csv"
[left.columns]
record_id = "record_id"
name = "name"
country = "country"
[left.columns.metrics]
rank = "rank"
score = "score"

[right]
source = "scorecard"
file = "scorecard.csv"
[right.columns]
record_id = "record_id"
name = "name"
country = "country"
[right.columns.metrics]
price = "price"
"#;

fn load_side(config: &MatchConfig, side_name: &str) -> SourceTable {
    let side = if side_name == "left" { &config.left } else { &config.right };
    let csv_path = fixtures_dir().join(&side.file);
    let csv_data = std::fs::read_to_string(&csv_path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", csv_path.display()));
    let rows = load_csv_rows(side_name, &csv_data, side).unwrap();
    SourceTable { source: side.source.clone(), rows }
}

#[test]
fn fixture_pipeline_end_to_end() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();
    let left = load_side(&config, "left");
    let right = load_side(&config, "right");

    let result = run(&config, &left, &right);

    assert_eq!(result.summary.left_total, 7);
    assert_eq!(result.summary.right_total, 6);
    assert_eq!(result.summary.matched, 5);

    // Every accepted pair carries both sides' metrics and a confident score.
    for row in &result.merged {
        assert!(row.match_confidence >= 90.0);
        assert!(row.metrics.contains_key("rank"), "{} lost its rank", row.institution);
        assert!(row.metrics.contains_key("price"), "{} lost its price", row.institution);
    }

    // Spelling and punctuation variants resolve to the same institution.
    let pair_of = |id: &str| {
        result
            .merged
            .iter()
            .find(|m| m.left_record_id == id)
            .map(|m| m.right_record_id.as_str())
    };
    assert_eq!(pair_of("arwu_1"), Some("sc_1")); // Harvard Univ.
    assert_eq!(pair_of("arwu_2"), Some("sc_3"));
    assert_eq!(pair_of("arwu_3"), Some("sc_2")); // MIT via abbreviation
    assert_eq!(pair_of("arwu_4"), Some("sc_4")); // hyphenated Berkeley
    assert_eq!(pair_of("arwu_6"), Some("sc_5"));

    // Cambridge has no US counterpart; the stop-word-only name is
    // unmatchable; Ohio State was never claimed.
    assert_eq!(result.summary.left_unmatched, 2);
    assert_eq!(result.summary.right_unmatched, 1);
    let reasons: Vec<(&str, UnmatchedReason)> = result
        .left_unmatched
        .iter()
        .map(|u| (u.record_id.as_str(), u.reason))
        .collect();
    assert!(reasons.contains(&("arwu_5", UnmatchedReason::BelowMinSimilarity)));
    assert!(reasons.contains(&("arwu_7", UnmatchedReason::UnmatchableName)));
    assert_eq!(result.right_unmatched[0].record_id, "sc_6");
}

#[test]
fn harvard_mit_scenario() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();

    let left_csv = "\
record_id,name,country,rank,score
a1,Harvard University,US,1,100.0
a2,MIT,US,3,75.4
";
    let right_csv = "\
record_id,name,country,price
b1,Harvard Univ.,US,54269
b2,Massachusetts Institute of Technology,US,59750
";
    let left = SourceTable {
        source: "arwu".into(),
        rows: load_csv_rows("left", left_csv, &config.left).unwrap(),
    };
    let right = SourceTable {
        source: "scorecard".into(),
        rows: load_csv_rows("right", right_csv, &config.right).unwrap(),
    };

    let result = run(&config, &left, &right);

    assert_eq!(result.summary.matched, 2, "expected exactly two matches");
    let harvard = result.merged.iter().find(|m| m.left_record_id == "a1").unwrap();
    let mit = result.merged.iter().find(|m| m.left_record_id == "a2").unwrap();
    assert_eq!(harvard.right_record_id, "b1");
    assert_eq!(mit.right_record_id, "b2");
    assert_eq!(harvard.metrics["price"], 54269.0);
    assert_eq!(mit.metrics["rank"], 3.0);
    assert!(result.left_unmatched.is_empty());
    assert!(result.right_unmatched.is_empty());
}

#[test]
fn result_serializes_to_json() {
    let config = MatchConfig::from_toml(CONFIG).unwrap();
    let left = load_side(&config, "left");
    let right = load_side(&config, "right");
    let result = run(&config, &left, &right);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["meta"]["config_name"], "ARWU vs Scorecard");
    assert_eq!(json["meta"]["min_similarity"], 90.0);
    assert_eq!(json["summary"]["matched"], 5);
    assert_eq!(
        json["left_unmatched"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|u| u["reason"] == "unmatchable_name")
            .count(),
        1
    );
}
