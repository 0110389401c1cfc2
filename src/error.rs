use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiglabError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SiglabError>;
