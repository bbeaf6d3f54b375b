//! Extraction error types.

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Gemini API key is not set. Configure gemini_api_key before extracting.")]
    MissingApiKey,

    #[error("No pages to send for extraction")]
    NoPages,

    #[error("Gemini API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gemini API returned no text")]
    EmptyResponse,

    #[error("The API returned an invalid data format. {0}")]
    InvalidFormat(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::MissingApiKey => ErrorKind::Configuration,
            ExtractError::NoPages => ErrorKind::Validation,
            ExtractError::Api { .. } | ExtractError::Network(_) => ErrorKind::Network,
            ExtractError::EmptyResponse | ExtractError::InvalidFormat(_) => ErrorKind::Decode,
        }
    }
}
