//! Error types for dashboard queries.

/// Message returned when a request body is not JSON.
pub const INVALID_BODY_MESSAGE: &str = "Invalid body, request body must be a valid json string";

/// Message returned when the window timestamps cannot be read.
pub const INVALID_TIMESTAMP_MESSAGE: &str =
    "startTimestampInSeconds and endTimestampInSeconds must be a Unix Timestamp";

/// Dashboard query errors.
///
/// Lookups that find nothing are not errors; they are reported through
/// [`crate::response::IssueTestsOutcome::Empty`].
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    /// Request body is not valid JSON.
    #[error("{}", INVALID_BODY_MESSAGE)]
    InvalidBody { detail: String },

    /// Window start or end is missing or not a Unix timestamp.
    #[error("{}", INVALID_TIMESTAMP_MESSAGE)]
    InvalidTimestamp { detail: String },

    /// Any other malformed request parameter.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The row source failed.
    #[error("row source failed: {0:#}")]
    Source(#[from] anyhow::Error),

    /// Response assembly failed.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DashError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// HTTP-style status for the error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidBody { .. }
            | Self::InvalidTimestamp { .. }
            | Self::InvalidParameter { .. } => 400,
            Self::Source(_) | Self::Internal { .. } => 500,
        }
    }

    /// Whether the request was rejected before any data was read.
    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }

    pub fn error_body(&self) -> serde_json::Value {
        error_body(&self.to_string())
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("failed to serialize response: {}", err),
        }
    }
}

/// `{"error": message}`, the body of every non-success response.
pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

/// Result type for dashboard queries.
pub type DashResult<T> = Result<T, DashError>;
