use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("incorrect date format: {0:?}, expected MM-YYYY")]
    InvalidDate(String),
    #[error("price must be non-negative, got {0}")]
    NegativePrice(i64),
    #[error("end_date must not be before start_date")]
    EndBeforeStart,
    #[error("window start_date must not be after end_date")]
    InvertedWindow,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
