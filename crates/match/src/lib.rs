//! `unirank-match` — fuzzy institution-name matching engine.
//!
//! Pure engine crate: receives pre-loaded records, returns a strict
//! one-to-one match with an audit trail. No CLI or network dependencies.
//!
//! Pipeline: canonicalize names → TF-IDF cosine similarity matrix →
//! confidence-filtered min-cost assignment → merged rows.

pub mod assign;
pub mod canon;
pub mod config;
pub mod engine;
pub mod error;
pub mod hungarian;
pub mod model;
pub mod similarity;

pub use canon::Canonicalizer;
pub use config::MatchConfig;
pub use engine::run;
pub use error::MatchError;
pub use model::{MatchOutcome, MatchResult, MergedRow, SourceRow, SourceTable};
