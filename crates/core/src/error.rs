use thiserror::Error;
use uuid::Uuid;

pub type InsightsResult<T> = Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Required column missing from source: {0}")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported source format: {0}")]
    UnsupportedSource(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Unknown analysis session: {0}")]
    UnknownSession(Uuid),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for InsightsError {
    fn from(err: config::ConfigError) -> Self {
        InsightsError::Config(err.to_string())
    }
}
