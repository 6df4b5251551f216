use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single row from one side's CSV: a free-text institution name plus
/// whatever numeric metrics that source carries. Absent metric = null.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub source: String,
    pub record_id: String,
    pub raw_name: String,
    pub country: String,
    pub metrics: BTreeMap<String, f64>,
}

/// Pre-loaded records for one side of a match.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub source: String,
    pub rows: Vec<SourceRow>,
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Dense rectangular similarity matrix, values in [0, 100].
/// Rows index the left side, columns the right side.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    pub rows: usize,
    pub cols: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, values: vec![0.0; rows * cols] }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        self.values[i * self.cols + j] = v;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// True when every entry is zero (nothing to assign).
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Why a row was excluded from, or rejected by, the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Canonicalization produced an empty token set.
    UnmatchableName,
    /// Best candidate scored below the similarity threshold.
    BelowMinSimilarity,
    /// Best candidate did not beat the runner-up by the minimum gap.
    GapRule,
    /// Every confident row preferred someone else; no partner left.
    NoPartner,
}

impl std::fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnmatchableName => write!(f, "unmatchable_name"),
            Self::BelowMinSimilarity => write!(f, "below_min_similarity"),
            Self::GapRule => write!(f, "gap_rule"),
            Self::NoPartner => write!(f, "no_partner"),
        }
    }
}

/// One accepted pairing between a left row and a right row.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPair {
    pub left: usize,
    pub right: usize,
    pub similarity: f64,
}

/// A record that did not make it into the assignment, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct Unmatched {
    pub index: usize,
    pub reason: UnmatchedReason,
}

/// Strict one-to-one assignment output: each left index and each right
/// index appears in at most one accepted pair. Rejected rows are
/// surfaced, never silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub pairs: Vec<MatchedPair>,
    pub left_unmatched: Vec<Unmatched>,
    pub right_unmatched: Vec<Unmatched>,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// The join of a matched pair: union of both sides' metrics keyed by
/// metric name (left wins on collision), plus the accepted similarity.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRow {
    pub institution: String,
    pub country: String,
    pub left_source: String,
    pub left_record_id: String,
    pub right_source: String,
    pub right_record_id: String,
    pub metrics: BTreeMap<String, f64>,
    pub match_confidence: f64,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub left_total: usize,
    pub right_total: usize,
    pub matched: usize,
    pub left_unmatched: usize,
    pub right_unmatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub config_name: String,
    pub engine_version: String,
    pub min_similarity: f64,
    pub min_gap: f64,
}

/// Full engine output: merged rows plus the audit trail of what did not
/// match and why.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub merged: Vec<MergedRow>,
    pub left_unmatched: Vec<UnmatchedRecord>,
    pub right_unmatched: Vec<UnmatchedRecord>,
}

/// An unmatched record as reported to the caller: enough identity to
/// audit by hand, plus the rejection reason.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedRecord {
    pub source: String,
    pub record_id: String,
    pub raw_name: String,
    pub reason: UnmatchedReason,
}
