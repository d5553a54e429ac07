use thiserror::Error;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur during rate limiting operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// Quota exhausted and the caller asked not to wait
    #[error("Rate limit exceeded")]
    Exceeded,

    #[error("Invalid rate limiter configuration: {0}")]
    InvalidConfig(&'static str),

    /// Admission abandoned before the operation was cleared to run
    #[error("Admission cancelled")]
    Cancelled,
}
