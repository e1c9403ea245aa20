use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
