//! Result of a single publish attempt.
//!
//! Publishing never returns an error to the caller. Every way an attempt can
//! end is a variant of [`PublishOutcome`], and each one is logged once.

use serde_json::Value;
use std::fmt;
use tracing::{error, info};

/// How a publish attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// HTTP 2xx with a truthy `result` and no `error`.
    Success,
    /// At least one coordinate was missing; nothing was sent.
    RejectedInvalidInput {
        latitude: Option<Value>,
        longitude: Option<Value>,
        yaw: Option<Value>,
    },
    /// The request never produced a response.
    NetworkError(NetworkFailure),
    /// The endpoint answered with a non-2xx status.
    HttpError { status: u16 },
    /// The response body carried a JSON-RPC `error` member.
    RpcError { error: Value },
    /// The response body was unusable.
    MalformedResponse(MalformedKind),
    /// Anything not covered above.
    UnexpectedError(String),
}

/// Transport-level failure categories.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkFailure {
    Timeout,
    Connection(String),
    Transport(String),
}

/// Ways a response body can be unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedKind {
    InvalidJson(String),
    MissingResult,
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success)
    }

    /// Short stable label, used as a log field.
    pub fn label(&self) -> &'static str {
        match self {
            PublishOutcome::Success => "success",
            PublishOutcome::RejectedInvalidInput { .. } => "invalid_input",
            PublishOutcome::NetworkError(NetworkFailure::Timeout) => "network_timeout",
            PublishOutcome::NetworkError(_) => "network_error",
            PublishOutcome::HttpError { .. } => "http_error",
            PublishOutcome::RpcError { .. } => "rpc_error",
            PublishOutcome::MalformedResponse(_) => "malformed_response",
            PublishOutcome::UnexpectedError(_) => "unexpected_error",
        }
    }

    /// Emit the log record for this outcome.
    pub(crate) fn log(&self) {
        match self {
            PublishOutcome::Success => {
                info!(outcome = self.label(), "GPSFabricConnector: Coordinates shared successfully.");
            }
            other => {
                error!(outcome = other.label(), "GPSFabricConnector: {}", other);
            }
        }
    }
}

fn display_opt(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Success => write!(f, "Coordinates shared successfully"),
            PublishOutcome::RejectedInvalidInput {
                latitude,
                longitude,
                yaw,
            } => write!(
                f,
                "Invalid coordinates - lat={}, lon={}, yaw={}",
                display_opt(latitude),
                display_opt(longitude),
                display_opt(yaw)
            ),
            PublishOutcome::NetworkError(NetworkFailure::Timeout) => {
                write!(f, "Request timeout when sending coordinates")
            }
            PublishOutcome::NetworkError(NetworkFailure::Connection(msg)) => {
                write!(f, "Connection error - {}", msg)
            }
            PublishOutcome::NetworkError(NetworkFailure::Transport(msg)) => {
                write!(f, "Network error - {}", msg)
            }
            PublishOutcome::HttpError { status } => write!(f, "HTTP error - status {}", status),
            PublishOutcome::RpcError { error } => write!(f, "JSON-RPC error - {}", error),
            PublishOutcome::MalformedResponse(MalformedKind::InvalidJson(msg)) => {
                write!(f, "Invalid JSON response - {}", msg)
            }
            PublishOutcome::MalformedResponse(MalformedKind::MissingResult) => {
                write!(f, "Failed to share coordinates - no valid result in response")
            }
            PublishOutcome::UnexpectedError(msg) => write!(f, "Unexpected error - {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labels() {
        assert_eq!(PublishOutcome::Success.label(), "success");
        assert_eq!(
            PublishOutcome::NetworkError(NetworkFailure::Timeout).label(),
            "network_timeout"
        );
        assert_eq!(
            PublishOutcome::NetworkError(NetworkFailure::Connection("refused".into())).label(),
            "network_error"
        );
        assert_eq!(PublishOutcome::HttpError { status: 502 }.label(), "http_error");
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(PublishOutcome::Success.is_success());
        assert!(!PublishOutcome::MalformedResponse(MalformedKind::MissingResult).is_success());
        assert!(!PublishOutcome::UnexpectedError("boom".into()).is_success());
    }

    #[test]
    fn test_rejection_message_names_missing_values() {
        let outcome = PublishOutcome::RejectedInvalidInput {
            latitude: None,
            longitude: Some(json!(1.0)),
            yaw: Some(json!(2.0)),
        };
        assert_eq!(
            outcome.to_string(),
            "Invalid coordinates - lat=None, lon=1.0, yaw=2.0"
        );
    }

    #[test]
    fn test_rpc_error_message_carries_payload() {
        let outcome = PublishOutcome::RpcError {
            error: json!({"code": 1}),
        };
        assert_eq!(outcome.to_string(), r#"JSON-RPC error - {"code":1}"#);
    }
}
