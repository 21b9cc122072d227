use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid purchase timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RfmResult<T> = Result<T, RfmError>;
