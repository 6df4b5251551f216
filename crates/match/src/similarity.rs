use std::collections::BTreeMap;

use crate::model::SimilarityMatrix;

/// Document frequency cap: terms present in more than this fraction of
/// the corpus carry no discriminative signal and are pruned.
const MAX_DF_RATIO: f64 = 0.8;

/// Pairwise similarity between two lists of canonical names, scaled to
/// [0, 100]. Empty canonical names produce all-zero rows/columns.
///
/// Primary scorer: TF-IDF over word unigrams + bigrams with cosine
/// similarity. When the vector space is degenerate (pruning leaves an
/// empty vocabulary, or a side has no usable names) the scorer falls
/// back to a sorted-token edit-distance ratio — canonical names are
/// already token-sorted, so plain normalized Levenshtein is
/// order-insensitive here.
///
/// Pure function: same inputs, same matrix.
pub fn similarity_matrix(left: &[String], right: &[String]) -> SimilarityMatrix {
    let mut matrix = SimilarityMatrix::zeros(left.len(), right.len());

    let left_valid: Vec<usize> = (0..left.len()).filter(|&i| !left[i].is_empty()).collect();
    let right_valid: Vec<usize> = (0..right.len()).filter(|&j| !right[j].is_empty()).collect();
    if left_valid.is_empty() || right_valid.is_empty() {
        return matrix;
    }

    match build_tfidf(left, right, &left_valid, &right_valid) {
        Some((left_vecs, right_vecs)) => {
            for (li, i) in left_valid.iter().enumerate() {
                for (rj, j) in right_valid.iter().enumerate() {
                    let sim = cosine(&left_vecs[li], &right_vecs[rj]);
                    matrix.set(*i, *j, sim * 100.0);
                }
            }
        }
        None => {
            // Degenerate vocabulary: every term everywhere, or nothing
            // survived pruning. Edit-distance ratio still separates
            // near-identical strings.
            for &i in &left_valid {
                for &j in &right_valid {
                    let sim = strsim::normalized_levenshtein(&left[i], &right[j]);
                    matrix.set(i, j, sim * 100.0);
                }
            }
        }
    }

    matrix
}

type SparseVec = BTreeMap<usize, f64>;

/// Build l2-normalized TF-IDF vectors for both sides over the combined
/// corpus. Returns None when pruning leaves an empty vocabulary.
fn build_tfidf(
    left: &[String],
    right: &[String],
    left_valid: &[usize],
    right_valid: &[usize],
) -> Option<(Vec<SparseVec>, Vec<SparseVec>)> {
    let docs: Vec<Vec<String>> = left_valid
        .iter()
        .map(|&i| terms_of(&left[i]))
        .chain(right_valid.iter().map(|&j| terms_of(&right[j])))
        .collect();
    let n_docs = docs.len();

    // Document frequency per term.
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    // Prune ubiquitous terms, index the survivors.
    let max_df = (MAX_DF_RATIO * n_docs as f64).floor() as usize;
    let vocab: BTreeMap<&str, usize> = df
        .iter()
        .filter(|(_, &count)| count <= max_df)
        .enumerate()
        .map(|(idx, (&term, _))| (term, idx))
        .collect();
    if vocab.is_empty() {
        return None;
    }

    // Smoothed idf, sklearn-style: ln((1 + n) / (1 + df)) + 1.
    let idf: BTreeMap<usize, f64> = vocab
        .iter()
        .map(|(&term, &idx)| {
            let d = df[term] as f64;
            (idx, ((1.0 + n_docs as f64) / (1.0 + d)).ln() + 1.0)
        })
        .collect();

    let mut vectors: Vec<SparseVec> = Vec::with_capacity(n_docs);
    for doc in &docs {
        let mut tf: SparseVec = BTreeMap::new();
        for term in doc {
            if let Some(&idx) = vocab.get(term.as_str()) {
                *tf.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in tf.iter_mut() {
            *weight *= idf[idx];
        }
        let norm: f64 = tf.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in tf.values_mut() {
                *weight /= norm;
            }
        }
        vectors.push(tf);
    }

    let right_vecs = vectors.split_off(left_valid.len());
    Some((vectors, right_vecs))
}

/// Word unigrams + bigrams of a canonical name.
fn terms_of(canonical: &str) -> Vec<String> {
    let tokens: Vec<&str> = canonical.split_whitespace().collect();
    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// Dot product of two l2-normalized sparse vectors.
fn cosine(a: &SparseVec, b: &SparseVec) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
        .sum()
}
