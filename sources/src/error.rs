use thiserror::Error;

/// Custom error type for fetching one point, allow us to differentiate between errors.
///
/// Only `Transport` is retried, everything else means the point is dropped.
///
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Giving up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
    #[error("Error {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Can not decode answer: {0}")]
    Decode(String),
}

impl FetchError {
    /// Is it worth trying again?
    ///
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}
