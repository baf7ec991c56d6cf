//! Error types for the record client.
//!
//! # Design
//! One variant per error shape the service can produce, checked in this
//! order by the normalizer: transport failure, non-200 status, unparseable
//! body, service-level `error` field, per-record `__error` markers. Payloads
//! are kept exactly as received so callers see what the service sent.

use serde_json::Value;

/// Failure reported by the transport before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::new(err.to_string())
    }
}

/// Errors returned by `RecordClient` and `Client`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection-level failure, passed through from the transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response arrived with a status other than 200. `body` is unparsed.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A 200 response whose body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Parse(String),

    /// The top-level `error` field of a 200 response, verbatim.
    #[error("service error: {0}")]
    Service(Value),

    /// The `__error` markers of every failed entry in a `records` batch.
    #[error("{} record(s) failed", .0.len())]
    RecordErrors(Vec<Value>),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Discriminant of `ApiError`, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    Parse,
    Service,
    RecordErrors,
    Serialization,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ApiError::Parse(_) => ErrorKind::Parse,
            ApiError::Service(_) => ErrorKind::Service,
            ApiError::RecordErrors(_) => ErrorKind::RecordErrors,
            ApiError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_status_display_includes_raw_body() {
        let err = ApiError::HttpStatus {
            status: 500,
            body: "server exploded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: server exploded");
    }

    #[test]
    fn record_errors_display_counts_failures() {
        let err = ApiError::RecordErrors(vec![json!({"message": "a"}), json!({"message": "b"})]);
        assert_eq!(err.to_string(), "2 record(s) failed");
        assert_eq!(err.kind(), ErrorKind::RecordErrors);
    }

    #[test]
    fn transport_error_converts() {
        let err: ApiError = TransportError::new("connection refused").into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
