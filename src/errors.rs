use thiserror::Error;

use crate::models::ValidationErrors;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("A swap submission is already in flight")]
    SubmissionInFlight,

    #[error("Submission ticket {0} is not the swap in flight")]
    StaleSubmission(String),

    #[error("Other: {0}")]
    Other(String),
}
