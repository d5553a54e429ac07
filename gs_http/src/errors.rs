use gs_ratelimit::RateLimitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: i64, message: String },

    #[error("Access token not configured")]
    MissingAccessToken,

    #[error("No requests deposited for spreadsheet {0}")]
    NoDepositedRequests(String),

    #[error("Rate limiter error: {0}")]
    RateLimit(#[from] RateLimitError),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
