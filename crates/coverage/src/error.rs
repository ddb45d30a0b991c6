use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoverageError>;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
