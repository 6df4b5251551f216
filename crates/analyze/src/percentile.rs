use crate::error::AnalyzeError;

/// How tied values share a rank. `Min` gives every member of a tie
/// group the group's first rank; `Average` gives the group mean. Either
/// way ties receive the same percentile — the rule is fixed per
/// dimension, never left to input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieRule {
    Min,
    Average,
}

/// 1-based ranks of `values` under the tie rule.
pub fn one_based_ranks(values: &[f64], rule: TieRule) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        // Find the tie group [i, j).
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let rank = match rule {
            TieRule::Min => (i + 1) as f64,
            TieRule::Average => (i + j + 1) as f64 / 2.0,
        };
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        i = j;
    }
    ranks
}

/// Percentiles where a HIGHER value earns a HIGHER percentile
/// (`rank_of_value / n * 100`). Used for price: more expensive = higher
/// price percentile.
pub fn ascending_percentiles(values: &[f64], rule: TieRule) -> Result<Vec<f64>, AnalyzeError> {
    require_population(values.len())?;
    let n = values.len() as f64;
    Ok(one_based_ranks(values, rule).into_iter().map(|r| r / n * 100.0).collect())
}

/// Percentiles where a LOWER value earns a HIGHER percentile
/// (`(n + 1 − rank_of_value) / n * 100`). Used for rank: rank 1 = top
/// percentile. Rank order, not raw magnitude, so uneven rank spacing
/// cannot distort the scale.
pub fn descending_percentiles(values: &[f64], rule: TieRule) -> Result<Vec<f64>, AnalyzeError> {
    require_population(values.len())?;
    let n = values.len() as f64;
    Ok(one_based_ranks(values, rule)
        .into_iter()
        .map(|r| (n + 1.0 - r) / n * 100.0)
        .collect())
}

/// Linear-interpolation quantile, `q` in [0, 1]. Population rules match
/// the percentile functions: fails on n ≤ 1.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, AnalyzeError> {
    require_population(values.len())?;
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64))
}

fn require_population(n: usize) -> Result<(), AnalyzeError> {
    if n <= 1 {
        return Err(AnalyzeError::InsufficientPopulation { needed: 2, got: n });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_without_ties() {
        let ranks = one_based_ranks(&[30.0, 10.0, 20.0], TieRule::Min);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn min_rank_ties_share_first_rank() {
        // Two 10s occupy ranks 1 and 2; both get 1 under Min.
        let ranks = one_based_ranks(&[10.0, 10.0, 20.0], TieRule::Min);
        assert_eq!(ranks, vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn average_rank_ties_share_mean_rank() {
        let ranks = one_based_ranks(&[10.0, 10.0, 20.0], TieRule::Average);
        assert_eq!(ranks, vec![1.5, 1.5, 3.0]);
    }

    #[test]
    fn descending_percentiles_favor_low_values() {
        // ARWU-style: rank 1 is best and must get the top percentile.
        let p = descending_percentiles(&[1.0, 2.0, 3.0, 4.0], TieRule::Min).unwrap();
        assert_eq!(p, vec![100.0, 75.0, 50.0, 25.0]);
    }

    #[test]
    fn ascending_percentiles_favor_high_values() {
        let p = ascending_percentiles(&[100.0, 300.0, 200.0], TieRule::Average).unwrap();
        let expected = [100.0 / 3.0, 100.0, 200.0 / 3.0];
        for (got, want) in p.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn monotone_in_rank_order() {
        // rank(x) < rank(y) implies rank_percentile(x) >= rank_percentile(y).
        let values = [5.0, 1.0, 9.0, 3.0, 3.0, 7.0];
        let p = descending_percentiles(&values, TieRule::Min).unwrap();
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] < values[j] {
                    assert!(p[i] >= p[j], "{} vs {}", values[i], values[j]);
                }
            }
        }
    }

    #[test]
    fn ties_get_identical_percentiles() {
        let p = descending_percentiles(&[151.0, 151.0, 151.0, 1.0], TieRule::Min).unwrap();
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert!(p[3] > p[0]);
    }

    #[test]
    fn population_of_one_is_an_error() {
        let err = ascending_percentiles(&[42.0], TieRule::Average).unwrap_err();
        match err {
            AnalyzeError::InsufficientPopulation { needed: 2, got: 1 } => {}
            other => panic!("expected InsufficientPopulation, got {other}"),
        }
        assert!(descending_percentiles(&[], TieRule::Min).is_err());
    }

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&values, 1.0).unwrap(), 4.0);
        assert_eq!(quantile(&values, 0.5).unwrap(), 2.5);
        assert_eq!(quantile(&values, 0.25).unwrap(), 1.75);
    }
}
