use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, missing side, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { side: String, column: String },
    /// Numeric metric parse error.
    MetricParse { side: String, record_id: String, column: String, value: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { side, column } => {
                write!(f, "side '{side}': missing column '{column}'")
            }
            Self::MetricParse { side, record_id, column, value } => {
                write!(
                    f,
                    "side '{side}', record '{record_id}': cannot parse {column} value '{value}'"
                )
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MatchError {}
