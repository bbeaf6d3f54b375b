//! Share token error types.

use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Failed to serialize share payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Share token could not be decoded: {0}")]
    Decode(String),

    #[error("Share token version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("No share token found in '{0}'")]
    MissingToken(String),
}

impl ShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShareError::Encode(_) => ErrorKind::Validation,
            ShareError::Decode(_)
            | ShareError::UnsupportedVersion { .. }
            | ShareError::MissingToken(_) => ErrorKind::Decode,
        }
    }
}
