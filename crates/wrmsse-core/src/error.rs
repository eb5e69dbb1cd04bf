use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrmsseError {
    #[error("input shape: {0}")]
    InputShape(String),

    #[error("schema: {0}")]
    Schema(String),

    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("series alignment: {0}")]
    Alignment(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WrmsseError>;
