use std::fmt;

#[derive(Debug)]
pub enum AnalyzeError {
    /// Percentiles over 0 or 1 records are meaningless; the caller must
    /// omit the statistic, never substitute a placeholder.
    InsufficientPopulation { needed: usize, got: usize },
    /// Score weights failed validation (negative, or not summing to 1).
    InvalidWeights(String),
    /// Missing required column in input data.
    MissingColumn(String),
    /// Numeric cell parse error.
    ValueParse { record: String, column: String, value: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientPopulation { needed, got } => {
                write!(f, "population too small: need at least {needed}, got {got}")
            }
            Self::InvalidWeights(msg) => write!(f, "invalid weights: {msg}"),
            Self::MissingColumn(column) => write!(f, "missing column '{column}'"),
            Self::ValueParse { record, column, value } => {
                write!(f, "record '{record}': cannot parse {column} value '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AnalyzeError {}
