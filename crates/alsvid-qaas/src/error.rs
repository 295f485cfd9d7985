//! Error types for the QaaS wire client.

use thiserror::Error;

/// Result type for QaaS operations.
pub type QaasResult<T> = Result<T, QaasError>;

/// Errors that can occur when talking to the QaaS control plane.
#[derive(Debug, Error)]
pub enum QaasError {
    /// HTTP request failed (network, TLS, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Missing API secret key.
    #[error("Missing QaaS secret key (set ALSVID_SECRET_KEY)")]
    MissingSecretKey,

    /// Missing project ID.
    #[error("Missing QaaS project ID (set ALSVID_PROJECT_ID)")]
    MissingProjectId,

    /// Requested resource does not exist (expired session, unknown job).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Project quota exceeded.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The server rejected a model or job payload. Not retryable without
    /// changing the payload.
    #[error("Payload rejected by server ({status}): {message}")]
    PayloadRejected { status: u16, message: String },

    /// Any other non-2xx API response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl QaasError {
    /// Whether this error is a payload rejection — the caller must fix the
    /// payload before resubmitting.
    pub fn is_payload_rejection(&self) -> bool {
        matches!(self, QaasError::PayloadRejected { .. })
    }

    /// Whether this error came from the transport layer rather than a
    /// classified API response.
    pub fn is_transport(&self) -> bool {
        matches!(self, QaasError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_key_display() {
        let err = QaasError::MissingSecretKey;
        assert!(err.to_string().contains("ALSVID_SECRET_KEY"));
    }

    #[test]
    fn test_missing_project_display() {
        let err = QaasError::MissingProjectId;
        assert!(err.to_string().contains("ALSVID_PROJECT_ID"));
    }

    #[test]
    fn test_auth_failed_display() {
        let err = QaasError::AuthFailed("token expired".into());
        assert!(err.to_string().contains("token expired"));
    }

    #[test]
    fn test_api_error_display() {
        let err = QaasError::Api {
            status: 403,
            message: "forbidden".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("forbidden"));
    }

    #[test]
    fn test_payload_rejected_classification() {
        let err = QaasError::PayloadRejected {
            status: 413,
            message: "payload too large".into(),
        };
        assert!(err.is_payload_rejection());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = QaasError::QuotaExceeded("3 sessions max".into());
        assert!(err.to_string().contains("3 sessions max"));
    }
}
