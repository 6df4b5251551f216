use std::collections::BTreeMap;

use crate::correlate::correlate;
use crate::error::AnalyzeError;
use crate::model::{
    AnalyzeMeta, AnalyzeResult, CorrelationEntry, Record, Scores, ScoredRow, SkippedGroup,
    SweetSpotEntry, SweetSpotReport,
};
use crate::percentile::{ascending_percentiles, descending_percentiles, quantile, TieRule};
use crate::value::{value_score, Weights};

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub weights: Weights,
    /// Entries in each sweet-spot list.
    pub top_n: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self { weights: Weights::default(), top_n: 15 }
    }
}

/// Score and summarize a merged rank+price table. Percentiles and value
/// scores are computed twice: over the whole table, and independently
/// within each country subgroup — cross-population percentile
/// comparison is only meaningful within a homogeneous population.
///
/// Records missing a dimension are excluded from that dimension's
/// population, never defaulted. Populations too small for a statistic
/// are omitted and flagged in `skipped`.
pub fn run(records: &[Record], options: &AnalyzeOptions) -> Result<AnalyzeResult, AnalyzeError> {
    options.weights.validate()?;

    let mut skipped: Vec<SkippedGroup> = Vec::new();

    let all: Vec<usize> = (0..records.len()).collect();
    let global = score_population(records, &all, options.weights, "global", &mut skipped);

    // Country subgroups, in stable name order.
    let mut by_country: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        by_country.entry(r.country.as_str()).or_default().push(i);
    }
    let mut within: BTreeMap<usize, Scores> = BTreeMap::new();
    for (&country, indices) in &by_country {
        let label = if country.is_empty() { "(no country)" } else { country };
        let scores = score_population(records, indices, options.weights, label, &mut skipped);
        within.extend(scores);
    }

    let scored: Vec<ScoredRow> = records
        .iter()
        .enumerate()
        .map(|(i, r)| ScoredRow {
            institution: r.institution.clone(),
            country: r.country.clone(),
            rank: r.rank,
            price: r.price,
            global: global.get(&i).cloned().unwrap_or_default(),
            within_country: within.get(&i).cloned().unwrap_or_default(),
        })
        .collect();

    // Correlations: global plus one per country subgroup.
    let mut correlations = Vec::new();
    correlation_for(records, &all, "global", &mut correlations, &mut skipped);
    for (&country, indices) in &by_country {
        let label = if country.is_empty() { "(no country)" } else { country };
        correlation_for(records, indices, label, &mut correlations, &mut skipped);
    }

    let sweet_spot = sweet_spots(&scored, options.top_n, &mut skipped);

    Ok(AnalyzeResult {
        meta: AnalyzeMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            w_rank: options.weights.rank,
            w_price: options.weights.price,
            records: records.len(),
        },
        scored,
        correlations,
        skipped,
        sweet_spot,
    })
}

/// Percentiles + value scores for the records at `indices`, keyed by
/// record index. Dimensions whose population is too small are omitted
/// for the whole group and flagged once.
fn score_population(
    records: &[Record],
    indices: &[usize],
    weights: Weights,
    group: &str,
    skipped: &mut Vec<SkippedGroup>,
) -> BTreeMap<usize, Scores> {
    let mut out: BTreeMap<usize, Scores> = indices.iter().map(|&i| (i, Scores::default())).collect();

    // Rank dimension: lower rank = higher percentile, min-rank ties.
    let ranked: Vec<(usize, f64)> = indices
        .iter()
        .filter_map(|&i| records[i].rank.map(|v| (i, v)))
        .collect();
    let values: Vec<f64> = ranked.iter().map(|(_, v)| *v).collect();
    match descending_percentiles(&values, TieRule::Min) {
        Ok(percentiles) => {
            for ((i, _), pct) in ranked.iter().zip(percentiles) {
                out.get_mut(i).unwrap().rank_percentile = Some(pct);
            }
        }
        Err(e) => {
            if !ranked.is_empty() {
                skipped.push(SkippedGroup {
                    group: group.into(),
                    statistic: "rank_percentile".into(),
                    reason: e.to_string(),
                });
            }
        }
    }

    // Price dimension: higher price = higher percentile, average ties.
    let priced: Vec<(usize, f64)> = indices
        .iter()
        .filter_map(|&i| records[i].price.map(|v| (i, v)))
        .collect();
    let values: Vec<f64> = priced.iter().map(|(_, v)| *v).collect();
    match ascending_percentiles(&values, TieRule::Average) {
        Ok(percentiles) => {
            for ((i, _), pct) in priced.iter().zip(percentiles) {
                out.get_mut(i).unwrap().price_percentile = Some(pct);
            }
        }
        Err(e) => {
            if !priced.is_empty() {
                skipped.push(SkippedGroup {
                    group: group.into(),
                    statistic: "price_percentile".into(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for scores in out.values_mut() {
        if let (Some(rp), Some(pp)) = (scores.rank_percentile, scores.price_percentile) {
            scores.value_score = Some(value_score(rp, pp, weights));
        }
    }

    out
}

fn correlation_for(
    records: &[Record],
    indices: &[usize],
    group: &str,
    correlations: &mut Vec<CorrelationEntry>,
    skipped: &mut Vec<SkippedGroup>,
) {
    let pairs: Vec<(f64, f64)> = indices
        .iter()
        .filter_map(|&i| match (records[i].price, records[i].rank) {
            (Some(p), Some(r)) => Some((p, r)),
            _ => None,
        })
        .collect();
    let prices: Vec<f64> = pairs.iter().map(|(p, _)| *p).collect();
    let ranks: Vec<f64> = pairs.iter().map(|(_, r)| *r).collect();

    match correlate(&prices, &ranks) {
        Some(c) => correlations.push(CorrelationEntry {
            group: group.into(),
            n: c.n,
            pearson_r: c.pearson_r,
            pearson_p: c.pearson_p,
            spearman_rho: c.spearman_rho,
            spearman_p: c.spearman_p,
        }),
        None => skipped.push(SkippedGroup {
            group: group.into(),
            statistic: "correlation".into(),
            reason: format!("n = {} (need > 3)", pairs.len()),
        }),
    }
}

/// Extract the high-value outliers from the globally scored rows.
fn sweet_spots(
    scored: &[ScoredRow],
    top_n: usize,
    skipped: &mut Vec<SkippedGroup>,
) -> SweetSpotReport {
    let complete: Vec<&ScoredRow> = scored
        .iter()
        .filter(|s| s.rank.is_some() && s.price.is_some() && s.global.value_score.is_some())
        .collect();

    let ranks: Vec<f64> = complete.iter().map(|s| s.rank.unwrap()).collect();
    let prices: Vec<f64> = complete.iter().map(|s| s.price.unwrap()).collect();

    let (rank_q25, price_q60, price_q25, rank_q70) = match (
        quantile(&ranks, 0.25),
        quantile(&prices, 0.60),
        quantile(&prices, 0.25),
        quantile(&ranks, 0.70),
    ) {
        (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
        _ => {
            skipped.push(SkippedGroup {
                group: "global".into(),
                statistic: "sweet_spot".into(),
                reason: format!("n = {} (need at least 2 complete records)", complete.len()),
            });
            return SweetSpotReport {
                top_value: Vec::new(),
                elite_bargains: Vec::new(),
                budget_champions: Vec::new(),
            };
        }
    };

    let entry = |s: &ScoredRow| SweetSpotEntry {
        institution: s.institution.clone(),
        country: s.country.clone(),
        rank: s.rank.unwrap(),
        price: s.price.unwrap(),
        value_score: s.global.value_score.unwrap(),
    };

    let by_value_desc = |a: &&ScoredRow, b: &&ScoredRow| {
        b.global
            .value_score
            .partial_cmp(&a.global.value_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    };

    let mut top = complete.clone();
    top.sort_by(by_value_desc);
    let top_value = top.iter().take(top_n).map(|s| entry(s)).collect();

    let mut elite: Vec<&ScoredRow> = complete
        .iter()
        .filter(|s| s.rank.unwrap() <= rank_q25 && s.price.unwrap() <= price_q60)
        .copied()
        .collect();
    elite.sort_by(|a, b| {
        a.rank.partial_cmp(&b.rank).unwrap_or(std::cmp::Ordering::Equal)
    });
    let elite_bargains = elite.iter().take(top_n).map(|s| entry(s)).collect();

    let mut budget: Vec<&ScoredRow> = complete
        .iter()
        .filter(|s| s.price.unwrap() <= price_q25 && s.rank.unwrap() <= rank_q70)
        .copied()
        .collect();
    budget.sort_by(by_value_desc);
    let budget_champions = budget.iter().take(top_n).map(|s| entry(s)).collect();

    SweetSpotReport { top_value, elite_bargains, budget_champions }
}

/// Load merged rows from CSV. `institution` and `country` columns are
/// fixed; the rank and price columns are caller-named because the
/// merged schema carries source-specific metric names. Blank cells are
/// nulls.
pub fn load_csv_records(
    csv_data: &str,
    rank_column: &str,
    price_column: &str,
) -> Result<Vec<Record>, AnalyzeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalyzeError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, AnalyzeError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalyzeError::MissingColumn(name.into()))
    };

    let institution_idx = idx("institution")?;
    let country_idx = idx("country")?;
    let rank_idx = idx(rank_column)?;
    let price_idx = idx(price_column)?;

    let parse_cell = |record: &csv::StringRecord,
                      i: usize,
                      column: &str,
                      institution: &str|
     -> Result<Option<f64>, AnalyzeError> {
        let cell = record.get(i).unwrap_or("").trim();
        if cell.is_empty() {
            return Ok(None);
        }
        cell.parse()
            .map(Some)
            .map_err(|_| AnalyzeError::ValueParse {
                record: institution.into(),
                column: column.into(),
                value: cell.into(),
            })
    };

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AnalyzeError::Io(e.to_string()))?;
        let institution = record.get(institution_idx).unwrap_or("").to_string();
        let country = record.get(country_idx).unwrap_or("").to_string();
        let rank = parse_cell(&record, rank_idx, rank_column, &institution)?;
        let price = parse_cell(&record, price_idx, price_column, &institution)?;
        records.push(Record { institution, country, rank, price });
    }
    Ok(records)
}
