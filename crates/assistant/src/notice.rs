//! Dismissible user-facing notices.

use core::fmt;

use smartfood_client::{ApiError, FailureKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// A message shown to the user until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Describe a failed backend call. `action` reads as "while {action}".
    pub fn from_api(action: &str, err: &ApiError) -> Self {
        let message = match err.kind() {
            FailureKind::NetworkFailure => {
                format!("Could not reach the pantry service while {action}: {err}")
            }
            FailureKind::NonSuccessStatus => {
                format!("The pantry service rejected the request while {action}: {err}")
            }
            FailureKind::MalformedResponse => {
                format!("The pantry service sent an unexpected reply while {action}: {err}")
            }
        };
        Self::error(message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Error => write!(f, "error: {}", self.message),
            NoticeKind::Success => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn api_failures_name_their_family() {
        let timeout = Notice::from_api("loading items", &ApiError::Timeout(Duration::from_secs(10)));
        assert!(timeout.is_error());
        assert!(timeout.message.starts_with("Could not reach"));
        assert!(timeout.message.contains("loading items"));

        let status = Notice::from_api(
            "deleting",
            &ApiError::Status {
                status: 404,
                body: "not found".into(),
            },
        );
        assert!(status.message.contains("rejected"));
        assert!(status.message.contains("404"));

        let malformed = Notice::from_api("predicting", &ApiError::Malformed("no days".into()));
        assert!(malformed.message.contains("unexpected reply"));
    }

    #[test]
    fn display_prefixes_errors_only() {
        assert_eq!(Notice::success("Saved").to_string(), "Saved");
        assert_eq!(Notice::error("boom").to_string(), "error: boom");
    }
}
