//! Error definitions for the client.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client-side validation failures, produced before any request is sent
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("{0}")]
    Multiple(String),
}

/// Session storage failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session storage: {0}")]
    Read(String),

    #[error("Failed to write session storage: {0}")]
    Write(String),
}

/// Failures talking to the remote wallet API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `message` carries the server-provided text
    #[error("{message}")]
    Status { status_code: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether this error must invalidate the local session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status_code: 401, .. })
    }

    /// The server-provided message, when one exists.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status {
            status_code: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Status {
            status_code: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_unauthorized());
        assert!(!ApiError::Network("refused".to_string()).is_unauthorized());
    }

    #[test]
    fn test_server_message_extraction() {
        let err = ApiError::Status {
            status_code: 422,
            message: "Saldo insuficiente".to_string(),
        };
        assert_eq!(err.server_message(), Some("Saldo insuficiente"));

        let err = ApiError::Status {
            status_code: 502,
            message: String::new(),
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(ApiError::Parse("bad json".to_string()).server_message(), None);
    }

    #[test]
    fn test_error_display_carries_message() {
        let err = AppError::Api(ApiError::Status {
            status_code: 400,
            message: "CPF inválido".to_string(),
        });
        assert_eq!(err.to_string(), "API error: CPF inválido");
    }
}
