//! Backend error types

use farmdesk_core::{Error, FieldErrors};
use thiserror::Error;

/// Message shown for every failure whose details are hidden from the user.
pub const GENERIC_MESSAGE: &str = "An error occurred. Please try again.";

/// Message shown when the backend rejects the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Errors that can occur when talking to the admin backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 401
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Server {
        status: u16,
        /// Server-supplied message, or a placeholder when the body had none
        message: String,
        /// Per-field validation messages, if the server sent any
        field_errors: FieldErrors,
    },

    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The configured base URL or a record id produced an invalid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Field-level messages to show inline in a form. Empty for most errors.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ApiError::Server { field_errors, .. } => field_errors.clone(),
            _ => FieldErrors::new(),
        }
    }

    /// Text shown in an alert.
    ///
    /// 4xx messages come from the server and are meant for users. Everything
    /// else collapses to a generic message unless `show_details` is set.
    pub fn user_message(&self, show_details: bool) -> String {
        match self {
            ApiError::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Server { status, message, .. } if (400..500).contains(status) => {
                message.clone()
            }
            other if show_details => other.to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Error::Unauthorized,
            ApiError::Server {
                status, message, ..
            } => Error::api(status, message),
            ApiError::Http(e) => Error::network(e.to_string()),
            ApiError::Decode(message) => Error::decode(message),
            ApiError::InvalidUrl(message) => Error::config(format!("invalid URL: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(
            ApiError::Unauthorized.user_message(false),
            SESSION_EXPIRED_MESSAGE
        );
        assert!(ApiError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn test_client_errors_show_server_message() {
        let err = ApiError::server(409, "Username already taken");
        assert_eq!(err.user_message(false), "Username already taken");
    }

    #[test]
    fn test_server_errors_hidden_unless_details() {
        let err = ApiError::server(500, "SQL timeout on dbo.Farmers");
        assert_eq!(err.user_message(false), GENERIC_MESSAGE);
        assert!(err.user_message(true).contains("SQL timeout"));
    }

    #[test]
    fn test_decode_error_hidden_unless_details() {
        let err = ApiError::decode("expected object");
        assert_eq!(err.user_message(false), GENERIC_MESSAGE);
        assert_eq!(err.user_message(true), "decode error: expected object");
    }

    #[test]
    fn test_field_errors_only_for_server_errors() {
        let mut fields = FieldErrors::new();
        fields.insert("Email".into(), "Email already registered".into());
        let err = ApiError::Server {
            status: 422,
            message: "Validation failed".into(),
            field_errors: fields,
        };
        assert_eq!(err.field_errors()["Email"], "Email already registered");
        assert!(ApiError::Unauthorized.field_errors().is_empty());
    }

    #[test]
    fn test_conversion_into_core_error() {
        let core: Error = ApiError::Unauthorized.into();
        assert!(core.is_unauthorized());

        let core: Error = ApiError::server(404, "not found").into();
        assert!(matches!(core, Error::Api { status: 404, .. }));
        assert!(core.is_recoverable());
    }
}
