//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    // ─────────────────────────────────────────────────────────────
    // Backend/API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Not authorized. Please sign in again.")]
    Unauthorized,

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    #[error("Unknown resource: {name}")]
    UnknownResource { name: String },

    // ─────────────────────────────────────────────────────────────
    // Validation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration/Storage Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Preference storage error: {message}")]
    Storage { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn unknown_resource(name: impl Into<String>) -> Self {
        Self::UnknownResource { name: name.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors become local UI state (inline message or alert);
    /// the dashboard keeps running with its prior data.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Api { .. }
                | Error::Network { .. }
                | Error::Decode { .. }
                | Error::Validation { .. }
                | Error::Storage { .. }
                | Error::Export { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TerminalInit(_) | Error::ConfigNotFound { .. } | Error::ChannelClosed
        )
    }

    /// Whether the backend rejected our credentials (login required)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::Api { status: 401, .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::api(500, "boom");
        assert_eq!(err.to_string(), "Server error (500): boom");

        let err = Error::Unauthorized;
        assert!(err.to_string().contains("sign in"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(Error::ConfigNotFound {
            path: PathBuf::from("/test")
        }
        .is_fatal());
        assert!(!Error::api(500, "x").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::api(500, "x").is_recoverable());
        assert!(Error::network("refused").is_recoverable());
        assert!(Error::validation("bad").is_recoverable());
        assert!(!Error::Unauthorized.is_recoverable());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(Error::api(401, "expired").is_unauthorized());
        assert!(!Error::api(403, "forbidden").is_unauthorized());
    }

    #[test]
    fn test_unknown_resource_message() {
        let err = Error::unknown_resource("tractors");
        assert!(err.to_string().contains("tractors"));
    }

    #[test]
    fn test_context_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("writing export").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
