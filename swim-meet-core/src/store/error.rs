//! Remote store error types.

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("GitHub storage is not fully configured. Provide owner, repo, and a token.")]
    NotConfigured,

    #[error("GitHub request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Meet not found at {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub response did not include file SHA")]
    MissingSha,

    #[error("Stored meet could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotConfigured => ErrorKind::Configuration,
            StoreError::Http { .. } | StoreError::Network(_) | StoreError::MissingSha => {
                ErrorKind::Network
            }
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Http { status, .. } => Some(*status),
            StoreError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
