//! Domain error types for the dashboard client.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Read operation failed (network, server or malformed response)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Write operation failed (group save, favorite toggle, preference update)
    #[error("Save error: {0}")]
    Save(String),

    /// Input rejected before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Save(_) => "SAVE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// The single notification shown to the user for this failure.
    ///
    /// Transport details are logged, never shown.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Fetch(detail) => {
                tracing::error!("Fetch error: {}", detail);
                "Failed to load data from the server".to_string()
            }
            AppError::Save(detail) => {
                tracing::error!("Save error: {}", detail);
                "Failed to save changes".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(_) => self.to_string(),
            AppError::Config(_) => self.to_string(),
        }
    }

    /// Build the notification payload for this error.
    pub fn notice(&self) -> ErrorNotice {
        ErrorNotice {
            error: self.code().to_string(),
            message: self.user_message(),
        }
    }
}

/// User-facing notification derived from an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorNotice {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Fetch(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("Invalid UUID: {}", err))
    }
}
