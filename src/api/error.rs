use thiserror::Error;

use crate::{ArcStr, cache::RequestKey};

/// Any failed API call: transport error, timeout, error status or a body
/// that is not JSON. Carries what is needed for a log line, not a kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {endpoint} failed: {message}")]
pub struct ApiFailure {
    pub endpoint: RequestKey,
    pub message: ArcStr,
}

impl ApiFailure {
    pub fn new(endpoint: RequestKey, message: impl std::fmt::Display) -> Self {
        Self {
            endpoint,
            message: ArcStr::from(message.to_string()),
        }
    }
}

/// Errors of the typed API helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Failure(#[from] ApiFailure),
    /// The response was JSON but not of the expected shape
    #[error("malformed response from {endpoint}: {message}")]
    Malformed {
        endpoint: RequestKey,
        message: ArcStr,
    },
}
