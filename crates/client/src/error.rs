//! Client error model.

use std::time::Duration;

use smartfood_core::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend round-trip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The failure families callers distinguish when reporting to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    NonSuccessStatus,
    MalformedResponse,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => FailureKind::NetworkFailure,
            ApiError::Status { .. } => FailureKind::NonSuccessStatus,
            ApiError::Malformed(_) => FailureKind::MalformedResponse,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Malformed(err.to_string())
    }
}
