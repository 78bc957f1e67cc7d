use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type shared by every cogforge service client.
#[derive(Debug, Error)]
pub enum CogError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{service} request failed with status {status}: {message}")]
    RemoteService {
        service: String,
        status: u16,
        /// Vendor error code from the error envelope, when one was returned.
        code: Option<String>,
        message: String,
        /// Raw response body.
        body: String,
    },

    #[error("local resource unavailable ({}): {reason}", path.display())]
    LocalResource { path: PathBuf, reason: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error during {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {operation}: {message}")]
    Decode { operation: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CogError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Vendor error code of a remote failure.
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            Self::RemoteService { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type CogResult<T> = Result<T, CogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display_includes_status() {
        let err = CogError::RemoteService {
            service: "ContentSafety".into(),
            status: 401,
            code: Some("InvalidSubscriptionKey".into()),
            message: "Access denied".into(),
            body: "{}".into(),
        };
        assert_eq!(
            err.to_string(),
            "ContentSafety request failed with status 401: Access denied"
        );
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.vendor_code(), Some("InvalidSubscriptionKey"));
    }

    #[test]
    fn local_resource_display_names_path() {
        let err = CogError::LocalResource {
            path: PathBuf::from("SampleImages/missing.jpg"),
            reason: "file not found".into(),
        };
        assert!(err.to_string().contains("SampleImages/missing.jpg"));
    }
}
