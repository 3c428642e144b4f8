use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical status codes reported by the service.
///
/// Discriminants match the wire values used in `google.rpc.Status.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    Cancelled = 1,
    #[default]
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl Code {
    /// Transient server conditions worth another attempt.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Code::Unavailable | Code::Internal | Code::ResourceExhausted
        )
    }

    /// Parse the `status` string of an HTTP error envelope, e.g. `"NOT_FOUND"`.
    pub fn from_name(name: &str) -> Option<Code> {
        let code = match name {
            "OK" => Code::Ok,
            "CANCELLED" => Code::Cancelled,
            "UNKNOWN" => Code::Unknown,
            "INVALID_ARGUMENT" => Code::InvalidArgument,
            "DEADLINE_EXCEEDED" => Code::DeadlineExceeded,
            "NOT_FOUND" => Code::NotFound,
            "ALREADY_EXISTS" => Code::AlreadyExists,
            "PERMISSION_DENIED" => Code::PermissionDenied,
            "RESOURCE_EXHAUSTED" => Code::ResourceExhausted,
            "FAILED_PRECONDITION" => Code::FailedPrecondition,
            "ABORTED" => Code::Aborted,
            "OUT_OF_RANGE" => Code::OutOfRange,
            "UNIMPLEMENTED" => Code::Unimplemented,
            "INTERNAL" => Code::Internal,
            "UNAVAILABLE" => Code::Unavailable,
            "DATA_LOSS" => Code::DataLoss,
            "UNAUTHENTICATED" => Code::Unauthenticated,
            _ => return None,
        };
        Some(code)
    }

    /// Best-effort classification of a bare HTTP status.
    pub fn from_http(status: u16) -> Code {
        match status {
            200..=299 => Code::Ok,
            400 => Code::InvalidArgument,
            401 => Code::Unauthenticated,
            403 => Code::PermissionDenied,
            404 => Code::NotFound,
            409 => Code::Aborted,
            412 => Code::FailedPrecondition,
            416 => Code::OutOfRange,
            429 => Code::ResourceExhausted,
            499 => Code::Cancelled,
            501 => Code::Unimplemented,
            503 => Code::Unavailable,
            504 => Code::DeadlineExceeded,
            500..=599 => Code::Internal,
            _ => Code::Unknown,
        }
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code as i32
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A structured failure reported by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: Code,

    #[serde(default)]
    pub message: String,

    /// Typed error details, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// All errors that can occur when using the Video Stitcher client.
#[derive(Error, Debug)]
pub enum StitcherError {
    /// Conflicting or invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No usable credentials could be resolved.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// A resource name did not match the pattern the method expects.
    #[error("invalid resource name {name:?}, expected {expected}")]
    InvalidResourceName { name: String, expected: &'static str },

    /// The server answered with a structured failure.
    #[error("status error {0}")]
    Status(Status),

    /// A network-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A network-level failure from a non-HTTP transport, or a closed transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The local call or polling deadline elapsed.
    #[error("deadline of {0:?} elapsed")]
    Timeout(Duration),

    /// The caller cancelled the call.
    #[error("call cancelled")]
    Cancelled,

    /// A long-running operation finished with an error.
    #[error("operation {name} failed: {status}")]
    OperationFailed { name: String, status: Status },

    /// A payload could not be decoded into the expected record.
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// An I/O error, typically from reading a credentials file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StitcherError {
    /// The server classification, for errors that carry one.
    pub fn code(&self) -> Option<Code> {
        match self {
            StitcherError::Status(status) => Some(status.code),
            StitcherError::OperationFailed { status, .. } => Some(status.code),
            _ => None,
        }
    }

    /// Default retry predicate: transport failures and transient statuses.
    pub fn is_retryable(&self) -> bool {
        match self {
            StitcherError::Http(e) => !(e.is_builder() || e.is_decode() || e.is_redirect()),
            StitcherError::Transport(_) => true,
            StitcherError::Status(status) => status.code.is_transient(),
            _ => false,
        }
    }
}

impl From<Status> for StitcherError {
    fn from(status: Status) -> Self {
        StitcherError::Status(status)
    }
}

/// A convenience alias for `Result<T, StitcherError>`.
pub type Result<T> = std::result::Result<T, StitcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_numeric_code() {
        let status: Status =
            serde_json::from_str(r#"{"code": 5, "message": "slate not found"}"#).unwrap();
        assert_eq!(status.code, Code::NotFound);
        assert_eq!(status.message, "slate not found");
        assert!(status.details.is_empty());
    }

    #[test]
    fn unknown_numeric_code_maps_to_unknown() {
        assert_eq!(Code::from(42), Code::Unknown);
        assert_eq!(i32::from(Code::Unavailable), 14);
    }

    #[test]
    fn retryability_follows_classification() {
        let transient = StitcherError::from(Status::new(Code::Unavailable, "try later"));
        let permanent = StitcherError::from(Status::new(Code::AlreadyExists, "exists"));

        assert!(transient.is_retryable());
        assert!(!permanent.is_retryable());
        assert!(StitcherError::Transport("connection reset".into()).is_retryable());
        assert!(!StitcherError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!StitcherError::Cancelled.is_retryable());
        assert!(!StitcherError::Config("both".into()).is_retryable());
    }

    #[test]
    fn http_status_fallback() {
        assert_eq!(Code::from_http(404), Code::NotFound);
        assert_eq!(Code::from_http(502), Code::Internal);
        assert_eq!(Code::from_http(503), Code::Unavailable);
        assert_eq!(Code::from_name("PERMISSION_DENIED"), Some(Code::PermissionDenied));
        assert_eq!(Code::from_name("nope"), None);
    }

    #[test]
    fn operation_failure_keeps_code() {
        let err = StitcherError::OperationFailed {
            name: "projects/p/locations/l/operations/o".into(),
            status: Status::new(Code::PermissionDenied, "denied"),
        };
        assert_eq!(err.code(), Some(Code::PermissionDenied));
        assert_eq!(StitcherError::Cancelled.code(), None);
    }
}
