use proptest::prelude::*;

use unirank_match::assign::resolve;
use unirank_match::canon::Canonicalizer;
use unirank_match::config::ThresholdConfig;
use unirank_match::model::SimilarityMatrix;

proptest! {
    /// canon(canon(s)) == canon(s) for arbitrary input.
    #[test]
    fn canonicalization_is_idempotent(s in "\\PC{0,60}") {
        let canon = Canonicalizer::default();
        let once = canon.canonical(&s);
        prop_assert_eq!(canon.canonical(&once), once);
    }

    /// Canonical output only ever contains sorted ASCII-alnum tokens.
    #[test]
    fn canonical_output_is_sorted_ascii(s in "\\PC{0,60}") {
        let canon = Canonicalizer::default();
        let out = canon.canonical(&s);
        let tokens: Vec<&str> = out.split_whitespace().collect();
        let mut sorted = tokens.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&tokens, &sorted);
        prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
    }

    /// Word order never changes the canonical form.
    #[test]
    fn canonicalization_is_order_insensitive(
        mut words in proptest::collection::vec("[a-z]{2,8}", 1..6)
    ) {
        let canon = Canonicalizer::default();
        let forward = canon.canonical(&words.join(" "));
        words.reverse();
        let backward = canon.canonical(&words.join(" "));
        prop_assert_eq!(forward, backward);
    }

    /// No left or right index ever appears in two accepted pairs, and
    /// every accepted pair clears the similarity threshold.
    #[test]
    fn assignment_is_one_to_one(
        rows in 1usize..7,
        cols in 1usize..7,
        values in proptest::collection::vec(0.0f64..100.0, 49),
        min_similarity in 50.0f64..95.0,
        min_gap in 0.0f64..10.0,
    ) {
        let mut matrix = SimilarityMatrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                matrix.set(i, j, values[i * 7 + j]);
            }
        }
        let thresholds = ThresholdConfig { min_similarity, min_gap };
        let outcome = resolve(&matrix, &thresholds);

        let mut lefts: Vec<usize> = outcome.pairs.iter().map(|p| p.left).collect();
        let mut rights: Vec<usize> = outcome.pairs.iter().map(|p| p.right).collect();
        let n = lefts.len();
        lefts.sort_unstable();
        lefts.dedup();
        rights.sort_unstable();
        rights.dedup();
        prop_assert_eq!(lefts.len(), n);
        prop_assert_eq!(rights.len(), n);

        for pair in &outcome.pairs {
            prop_assert!(pair.similarity >= min_similarity);
        }

        // Accounting: every left index is either paired or unmatched.
        prop_assert_eq!(outcome.pairs.len() + outcome.left_unmatched.len(), rows);
        prop_assert_eq!(outcome.pairs.len() + outcome.right_unmatched.len(), cols);
    }
}
