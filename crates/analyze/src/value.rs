use serde::Deserialize;

use crate::error::AnalyzeError;

/// Blend weights for the value score. Rank is weighted above price by
/// default (0.6/0.4) — an empirical choice carried over from the
/// analysis this tool grew out of, not a derived constant.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Weights {
    pub rank: f64,
    pub price: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { rank: 0.6, price: 0.4 }
    }
}

impl Weights {
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if self.rank < 0.0 || self.price < 0.0 {
            return Err(AnalyzeError::InvalidWeights(format!(
                "weights must be non-negative, got {}/{}",
                self.rank, self.price
            )));
        }
        if (self.rank + self.price - 1.0).abs() > 1e-9 {
            return Err(AnalyzeError::InvalidWeights(format!(
                "weights must sum to 1, got {} + {} = {}",
                self.rank,
                self.price,
                self.rank + self.price
            )));
        }
        Ok(())
    }
}

/// `w_rank · rank_percentile + w_price · (100 − price_percentile)`.
/// High rank percentile = good ranking; low price percentile = cheap;
/// both push the score up. Stays in [0, 100] for valid weights.
pub fn value_score(rank_percentile: f64, price_percentile: f64, weights: Weights) -> f64 {
    weights.rank * rank_percentile + weights.price * (100.0 - price_percentile)
}
