//! `unirank-analyze` — value scoring and rank/price statistics.
//!
//! Pure engine crate: receives merged rank+price records, returns
//! percentile-based value scores, correlation summaries, and sweet-spot
//! outliers. No CLI or network dependencies.

pub mod correlate;
pub mod engine;
pub mod error;
pub mod model;
pub mod percentile;
pub mod value;

pub use engine::{load_csv_records, run, AnalyzeOptions};
pub use error::AnalyzeError;
pub use model::{AnalyzeResult, Record, ScoredRow};
pub use value::Weights;
