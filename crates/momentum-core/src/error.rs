//! Core error types for momentum-core.
//!
//! Each concern gets its own `thiserror` enum; [`CoreError`] aggregates them
//! for callers (like the CLI) that only need to report a message.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for momentum-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Gateway/HTTP errors
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential storage errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Progress evaluation errors
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the REST gateway.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 4xx on login/register, or a rejected session on any authenticated
    /// call.
    #[error("Authentication failed: {detail}")]
    Auth { detail: String },

    /// 404 from the server.
    #[error("Not found: {detail}")]
    NotFound { detail: String },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// No usable response was received.
    #[error("Network error: {0}")]
    Network(String),
}

impl ClientError {
    /// The text shown next to the action that failed.
    ///
    /// Server-supplied detail is surfaced verbatim; transport failures get a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(e) => e.to_string(),
            ClientError::Auth { detail }
            | ClientError::NotFound { detail }
            | ClientError::Api { detail, .. } => detail.clone(),
            ClientError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
        }
    }

    /// Whether this error means the stored session is no longer valid.
    pub fn is_session_rejected(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Progress evaluation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Invalid input: total steps must be positive (got {total})")]
    InvalidInput { total: i64 },
}

/// Client-side validation errors for drafts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text was empty or whitespace.
    #[error("{field} must not be empty")]
    Blank { field: &'static str },

    /// Number outside the accepted range.
    #[error("{field} must be at least {min} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        value: i64,
    },

    /// Malformed value.
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    /// An update that changes nothing.
    #[error("Nothing to update")]
    EmptyPatch,
}

/// Credential storage errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Failed to access credential file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored credential is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be determined or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_detail() {
        let err = ClientError::Api {
            status: 400,
            detail: "Email already registered".into(),
        };
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn network_errors_get_fallback_message() {
        let err = ClientError::Network("connection refused".into());
        assert!(err.user_message().contains("Could not reach the server"));
    }

    #[test]
    fn only_auth_errors_reject_the_session() {
        assert!(ClientError::Auth { detail: "x".into() }.is_session_rejected());
        assert!(!ClientError::NotFound { detail: "x".into() }.is_session_rejected());
        assert!(!ClientError::Api { status: 403, detail: "x".into() }.is_session_rejected());
    }
}
