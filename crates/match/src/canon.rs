use std::collections::{BTreeMap, BTreeSet};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::CanonicalConfig;

/// Maps a free-text institution name to its canonical token signature:
/// lowercased, diacritics folded, abbreviations expanded on whole-token
/// boundaries, punctuation stripped, stop words removed, surviving
/// tokens sorted and space-joined.
///
/// An empty output means the name carried no discriminative tokens
/// (e.g. it was nothing but stop words) — such records are unmatchable
/// and must be excluded from similarity scoring.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    stop_words: BTreeSet<String>,
    abbreviations: BTreeMap<String, String>,
}

impl Canonicalizer {
    pub fn new(config: &CanonicalConfig) -> Self {
        Self {
            stop_words: config.stop_words.iter().cloned().collect(),
            abbreviations: config.abbreviations.clone(),
        }
    }

    pub fn canonical(&self, raw: &str) -> String {
        let folded = fold_ascii(raw);

        let mut tokens: Vec<String> = Vec::new();
        for piece in folded.split_whitespace() {
            // First expansion pass on the raw whitespace token, so symbol
            // abbreviations like "&" survive the punctuation strip below.
            let piece = match self.abbreviations.get(piece) {
                Some(full) => full.clone(),
                None => piece.to_string(),
            };

            let cleaned: String = piece
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
                .collect();

            for tok in cleaned.split_whitespace() {
                // Second pass catches tokens punctuation was hiding
                // ("univ." only becomes "univ" after the strip). An
                // expansion may be several words; each one faces the
                // stop-word filter on its own.
                let expanded = self.abbreviations.get(tok).map(String::as_str).unwrap_or(tok);
                for word in expanded.split_whitespace() {
                    if !self.stop_words.contains(word) {
                        tokens.push(word.to_string());
                    }
                }
            }
        }

        tokens.sort();
        tokens.join(" ")
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&CanonicalConfig::default())
    }
}

/// Lowercase, NFD-decompose, drop combining marks, keep ASCII.
fn fold_ascii(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect()
}
