use crate::config::ThresholdConfig;
use crate::hungarian::min_cost_assignment;
use crate::model::{MatchOutcome, MatchedPair, SimilarityMatrix, Unmatched, UnmatchedReason};

/// Resolve a similarity matrix into a strict one-to-one assignment.
///
/// Three passes:
/// 1. Confidence filter — a row is eligible only when its best score
///    meets `min_similarity` AND beats the runner-up by `min_gap`
///    (rows with fewer than two nonzero candidates treat the runner-up
///    as 0). Ineligible rows are zeroed out so they cannot consume an
///    assignment slot a confident row needs.
/// 2. Exact min-cost assignment (cost = 100 − similarity) over the
///    filtered matrix.
/// 3. Final acceptance — solver output pairs whose similarity no longer
///    meets `min_similarity` were forced onto zero-cost placeholders
///    and are discarded, not reported.
///
/// An incomplete match is preferred over a wrong one: everything that
/// fails a pass lands in the unmatched sets with its reason.
pub fn resolve(matrix: &SimilarityMatrix, thresholds: &ThresholdConfig) -> MatchOutcome {
    let (rows, cols) = (matrix.rows, matrix.cols);

    // Pass 1: confidence filter.
    let mut filtered = SimilarityMatrix::zeros(rows, cols);
    let mut row_rejection: Vec<Option<UnmatchedReason>> = vec![None; rows];

    for i in 0..rows {
        let row = matrix.row(i);
        let (best, second) = best_two(row);

        if best < thresholds.min_similarity {
            row_rejection[i] = Some(UnmatchedReason::BelowMinSimilarity);
            continue;
        }
        if best - second < thresholds.min_gap {
            row_rejection[i] = Some(UnmatchedReason::GapRule);
            continue;
        }
        for j in 0..cols {
            filtered.set(i, j, matrix.get(i, j));
        }
    }

    // Pass 2: assignment. A degenerate (all-zero) matrix yields an
    // empty assignment rather than an error.
    let assignment = if filtered.is_all_zero() {
        vec![None; rows]
    } else {
        min_cost_assignment(rows, cols, |i, j| 100.0 - filtered.get(i, j))
    };

    // Pass 3: final acceptance.
    let mut pairs = Vec::new();
    let mut left_unmatched = Vec::new();
    let mut right_taken = vec![false; cols];

    for i in 0..rows {
        if let Some(reason) = row_rejection[i] {
            left_unmatched.push(Unmatched { index: i, reason });
            continue;
        }
        let accepted = assignment[i].and_then(|j| {
            let similarity = filtered.get(i, j);
            (similarity >= thresholds.min_similarity).then_some((j, similarity))
        });
        match accepted {
            Some((j, similarity)) => {
                pairs.push(MatchedPair { left: i, right: j, similarity });
                right_taken[j] = true;
            }
            None => left_unmatched.push(Unmatched {
                index: i,
                reason: UnmatchedReason::NoPartner,
            }),
        }
    }

    let right_unmatched = (0..cols)
        .filter(|&j| !right_taken[j])
        .map(|index| Unmatched { index, reason: UnmatchedReason::NoPartner })
        .collect();

    MatchOutcome { pairs, left_unmatched, right_unmatched }
}

/// Best and second-best values of a row, counting only nonzero entries
/// toward the runner-up.
fn best_two(row: &[f64]) -> (f64, f64) {
    let mut best = 0.0f64;
    let mut second = 0.0f64;
    let mut nonzero = 0usize;
    for &v in row {
        if v > 0.0 {
            nonzero += 1;
        }
        if v > best {
            second = best;
            best = v;
        } else if v > second {
            second = v;
        }
    }
    if nonzero < 2 {
        (best, 0.0)
    } else {
        (best, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(values: &[&[f64]]) -> SimilarityMatrix {
        let rows = values.len();
        let cols = if rows == 0 { 0 } else { values[0].len() };
        let mut m = SimilarityMatrix::zeros(rows, cols);
        for (i, row) in values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        m
    }

    fn thresholds(min_similarity: f64, min_gap: f64) -> ThresholdConfig {
        ThresholdConfig { min_similarity, min_gap }
    }

    #[test]
    fn confident_pair_accepted() {
        let m = matrix(&[&[97.0, 30.0], &[25.0, 95.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert_eq!(out.pairs.len(), 2);
        assert_eq!((out.pairs[0].left, out.pairs[0].right), (0, 0));
        assert_eq!((out.pairs[1].left, out.pairs[1].right), (1, 1));
        assert!(out.left_unmatched.is_empty());
        assert!(out.right_unmatched.is_empty());
    }

    #[test]
    fn gap_rule_rejects_close_runner_up() {
        // best=92 >= 90 but gap=2 < 5: the row must be rejected.
        let m = matrix(&[&[92.0, 90.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert!(out.pairs.is_empty());
        assert_eq!(out.left_unmatched.len(), 1);
        assert_eq!(out.left_unmatched[0].reason, UnmatchedReason::GapRule);
    }

    #[test]
    fn threshold_rejects_regardless_of_gap() {
        // best=85 < 90: rejected even with a huge gap.
        let m = matrix(&[&[85.0, 10.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert!(out.pairs.is_empty());
        assert_eq!(out.left_unmatched[0].reason, UnmatchedReason::BelowMinSimilarity);
    }

    #[test]
    fn single_candidate_passes_gap_trivially() {
        // One nonzero entry: runner-up counts as 0, gap is huge.
        let m = matrix(&[&[95.0, 0.0, 0.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert_eq!(out.pairs.len(), 1);
        assert_eq!(out.pairs[0].similarity, 95.0);
    }

    #[test]
    fn tied_best_scores_fail_gap() {
        let m = matrix(&[&[95.0, 95.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert!(out.pairs.is_empty());
        assert_eq!(out.left_unmatched[0].reason, UnmatchedReason::GapRule);
    }

    #[test]
    fn assignment_resolves_double_booking_globally() {
        // Both rows clear the filters against distinct runner-ups, but
        // row 0's best column is also row 1's best column. The global
        // assignment gives column 0 to row 1 (better fit) and column 1
        // to row 0 instead of letting greedy order decide.
        let m = matrix(&[&[96.0, 93.0, 0.0], &[99.0, 0.0, 20.0]]);
        let out = resolve(&m, &thresholds(90.0, 2.0));
        assert_eq!(out.pairs.len(), 2);
        let mut pairs: Vec<(usize, usize)> =
            out.pairs.iter().map(|p| (p.left, p.right)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn zeroed_rows_do_not_consume_slots() {
        // Row 0 fails the threshold; its zeroed row must not steal
        // column 0 from the confident row 1.
        let m = matrix(&[&[80.0, 0.0], &[95.0, 0.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert_eq!(out.pairs.len(), 1);
        assert_eq!((out.pairs[0].left, out.pairs[0].right), (1, 0));
        assert_eq!(out.left_unmatched[0].reason, UnmatchedReason::BelowMinSimilarity);
    }

    #[test]
    fn forced_placeholder_pairs_are_discarded() {
        // Row 1 is eligible but its only real candidate is taken by the
        // stronger row 0; the solver parks row 1 on a zero column, which
        // the acceptance pass must discard.
        let m = matrix(&[&[98.0, 0.0], &[91.0, 0.0]]);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert_eq!(out.pairs.len(), 1);
        assert_eq!((out.pairs[0].left, out.pairs[0].right), (0, 0));
        assert_eq!(out.left_unmatched.len(), 1);
        assert_eq!(out.left_unmatched[0].index, 1);
        assert_eq!(out.left_unmatched[0].reason, UnmatchedReason::NoPartner);
        assert_eq!(out.right_unmatched.len(), 1);
        assert_eq!(out.right_unmatched[0].index, 1);
    }

    #[test]
    fn degenerate_all_zero_matrix_yields_empty_assignment() {
        let m = SimilarityMatrix::zeros(3, 2);
        let out = resolve(&m, &thresholds(90.0, 5.0));
        assert!(out.pairs.is_empty());
        assert_eq!(out.left_unmatched.len(), 3);
        assert_eq!(out.right_unmatched.len(), 2);
    }

    #[test]
    fn one_to_one_invariant() {
        let m = matrix(&[
            &[95.0, 40.0, 10.0],
            &[96.0, 91.0, 0.0],
            &[0.0, 0.0, 99.0],
        ]);
        let out = resolve(&m, &thresholds(90.0, 2.0));
        let mut lefts: Vec<usize> = out.pairs.iter().map(|p| p.left).collect();
        let mut rights: Vec<usize> = out.pairs.iter().map(|p| p.right).collect();
        lefts.sort_unstable();
        rights.sort_unstable();
        let before = (lefts.len(), rights.len());
        lefts.dedup();
        rights.dedup();
        assert_eq!(before, (lefts.len(), rights.len()));
    }
}
