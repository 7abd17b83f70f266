//! Engine error types

use thiserror::Error;

/// Errors that can occur while loading data, searching or talking to the LLM
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("LLM API error ({status}): {message}")]
    Llm { status: u16, message: String },

    #[error("Invalid judge verdict: {0}")]
    Verdict(String),

    #[error("Unknown recipe field: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
