//! Error classification shared by every component.

use std::fmt;

/// Broad category of a failure, used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing credentials or settings, detected before any network call.
    Configuration,
    /// Transport failure or a non-success HTTP status.
    Network,
    /// Malformed share token, stored blob or model response.
    Decode,
    /// Input the operation cannot accept, such as publishing an empty meet.
    Validation,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Network => "network",
            ErrorKind::Decode => "decode",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
