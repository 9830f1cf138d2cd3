#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no medication at index {0}")]
    RecordIndexOutOfRange(usize),
    #[error("failed to create schedule directory: {0}")]
    StoreDirCreation(std::io::Error),
    #[error("failed to write schedule file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize schedule: {0}")]
    Serialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
