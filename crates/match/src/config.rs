use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::MatchError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    pub left: SideConfig,
    pub right: SideConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub canonical: CanonicalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One side of the match: where its CSV lives and how its columns map
/// onto the engine's row model.
#[derive(Debug, Clone, Deserialize)]
pub struct SideConfig {
    pub source: String,
    pub file: String,
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub record_id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    /// metric name -> CSV column carrying it. Blank cells are nulls.
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Confidence policy for the assignment resolver. The defaults were
/// chosen empirically against the ARWU/Scorecard corpus, not derived
/// from a labeled validation set — treat them as starting points.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,
}

fn default_min_similarity() -> f64 {
    90.0
}

fn default_min_gap() -> f64 {
    5.0
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            min_gap: default_min_gap(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonicalizer dictionaries
// ---------------------------------------------------------------------------

/// Stop words and abbreviation expansions for the canonicalizer.
/// Overridable so the matcher can serve other domains; the defaults fit
/// institution names.
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalConfig {
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    #[serde(default = "default_abbreviations")]
    pub abbreviations: BTreeMap<String, String>,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            abbreviations: default_abbreviations(),
        }
    }
}

fn default_stop_words() -> Vec<String> {
    [
        "university", "college", "school", "institute", "institution",
        "of", "the", "at", "for", "and", "in", "on",
        "state", "system", "campus", "main", "branch",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_abbreviations() -> BTreeMap<String, String> {
    [
        ("univ", "university"),
        ("inst", "institute"),
        ("tech", "technology"),
        ("mit", "massachusetts institute of technology"),
        ("sci", "science"),
        ("eng", "engineering"),
        ("&", "and"),
        ("u", "university"),
        ("calif", "california"),
        ("penn", "pennsylvania"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub merged_csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let t = &self.thresholds;
        if !(0.0..=100.0).contains(&t.min_similarity) {
            return Err(MatchError::ConfigValidation(format!(
                "min_similarity must be in [0, 100], got {}",
                t.min_similarity
            )));
        }
        if t.min_gap < 0.0 {
            return Err(MatchError::ConfigValidation(format!(
                "min_gap must be non-negative, got {}",
                t.min_gap
            )));
        }
        if self.left.source == self.right.source {
            return Err(MatchError::ConfigValidation(format!(
                "left and right sides must name different sources (both '{}')",
                self.left.source
            )));
        }
        for (side, cfg) in [("left", &self.left), ("right", &self.right)] {
            if cfg.file.is_empty() {
                return Err(MatchError::ConfigValidation(format!(
                    "side '{side}' has an empty file path"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
