use serde::Deserialize;
use thiserror::Error;

/// How a failure is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dismissible banner at the top of the page.
    RequestFailed,
    /// Inline message beside a form field.
    ValidationFailed,
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{method} {path} failed: {source}")]
    Request {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path} returned {status}: {message}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    #[error("decoding response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Config(String),
}

/// Error body returned by the operator backend.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    detailed_message: String,
}

impl ConsoleError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a status error, preferring the backend's own message over the raw body.
    pub fn from_status(method: &'static str, path: &str, status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(e) if !e.message.is_empty() => e.message,
            Ok(e) if !e.detailed_message.is_empty() => e.detailed_message,
            _ => body.trim().to_string(),
        };
        ConsoleError::Status {
            method,
            path: path.to_string(),
            status,
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConsoleError::Validation { .. } => ErrorKind::ValidationFailed,
            _ => ErrorKind::RequestFailed,
        }
    }

    /// Text shown to the user in a banner or beside a field.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Status { message, status, .. } if !message.is_empty() => {
                format!("{} ({})", message, status)
            }
            ConsoleError::Status { status, .. } => format!("request failed with status {}", status),
            ConsoleError::Validation { message, .. } => message.clone(),
            ConsoleError::Request { .. } => "could not reach the operator backend".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConsoleError::Status { status: 404, .. })
    }
}
