use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("table parse error: {0}")]
    Parse(String),

    #[error("invalid table: {0}")]
    Invalid(String),

    #[error("unknown benchmark: {0}")]
    UnknownBenchmark(String),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
