//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Every failure the chat loop can surface maps to exactly one variant,
//! so callers match on the kind instead of scraping display strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GEMINI_API_KEY is not set")]
    MissingCredential,

    #[error("unauthorized (401): check your API key")]
    Unauthorized,

    #[error("model endpoint not found (404)")]
    NotFound,

    #[error("request to Gemini failed: {0}")]
    Transport(String),

    #[error("malformed Gemini response: {0}")]
    MalformedResponse(String),

    #[error("media processing error: {0}")]
    MediaProcessing(String),

    #[error("{0} support is not available")]
    CapabilityUnavailable(&'static str),

    #[error("unknown content category: {0}")]
    InvalidCategory(String),

    #[error("unknown model: {0}")]
    InvalidModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
