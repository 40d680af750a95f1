use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrzError {
    #[error("MRZ parsing error: {0}")]
    MrzParsingError(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
