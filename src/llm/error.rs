//! Generation error types

use thiserror::Error;

/// Upstream generation failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    /// HTTP status reported by the provider, if it got that far
    pub status: Option<u16>,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Network, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unknown, message)
    }

    /// Classify a non-success provider response
    pub fn from_status(status: u16, body: &str) -> Self {
        let (kind, label) = match status {
            401 | 403 => (GenerationErrorKind::Auth, "Authentication failed"),
            429 => (GenerationErrorKind::RateLimit, "Rate limited"),
            400 => (GenerationErrorKind::InvalidRequest, "Invalid request"),
            500..=599 => (GenerationErrorKind::ServerError, "Server error"),
            _ => (GenerationErrorKind::Unknown, "Unexpected status"),
        };
        Self::new(kind, format!("{label} (HTTP {status}): {}", upstream_message(body)))
            .with_status(status)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Connection failures, timeouts, interrupted streams
    Network,
    /// Quota or rate limit (429)
    RateLimit,
    /// Provider-side failure (5xx)
    ServerError,
    /// Bad credentials (401, 403)
    Auth,
    /// Provider rejected the request (400)
    InvalidRequest,
    /// Response did not match the expected wire format
    Malformed,
    Unknown,
}

/// Pull `error.message` out of a provider error body, falling back to the raw body
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_statuses() {
        let cases = [
            (401, GenerationErrorKind::Auth),
            (403, GenerationErrorKind::Auth),
            (429, GenerationErrorKind::RateLimit),
            (400, GenerationErrorKind::InvalidRequest),
            (503, GenerationErrorKind::ServerError),
            (404, GenerationErrorKind::Unknown),
        ];
        for (status, kind) in cases {
            let err = GenerationError::from_status(status, "");
            assert_eq!(err.kind, kind, "status {status}");
            assert_eq!(err.status, Some(status));
        }
    }

    #[test]
    fn test_extracts_provider_message() {
        let body = r#"{"error":{"code":"429","message":"Requests to the deployment exceeded quota"}}"#;
        let err = GenerationError::from_status(429, body);
        assert_eq!(
            err.to_string(),
            "Rate limited (HTTP 429): Requests to the deployment exceeded quota"
        );
    }

    #[test]
    fn test_falls_back_to_raw_body() {
        let err = GenerationError::from_status(502, "bad gateway\n");
        assert_eq!(err.message, "Server error (HTTP 502): bad gateway");
    }
}
