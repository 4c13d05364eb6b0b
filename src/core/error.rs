use thiserror::Error;

use crate::core::validation::ValidationError;

/// Centralized error types for the client
///
/// Everything that can go wrong between the user typing a URL and the file landing on
/// disk is converted to this enum. Uses `thiserror` for automatic conversion and display.
///
/// # Example
///
/// ```
/// use tubefetch::core::error::{AppError, ErrorKind};
///
/// let err = AppError::NoMetadata;
/// assert_eq!(err.kind(), ErrorKind::NoMetadata);
/// assert_eq!(err.to_string(), "Please fetch video information first");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or empty URL, caught before any network call
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Download attempted without a successful metadata fetch
    #[error("Please fetch video information first")]
    NoMetadata,

    /// HTTP transport errors (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the backend, with its `error` message if it sent one
    #[error("Backend returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Backend {
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    /// Malformed JSON from the backend
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// User-initiated abort
    #[error("Download cancelled")]
    Cancelled,

    /// IO errors (saving the file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task panicked or was aborted before reporting back
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// URL parsing errors (backend base URL)
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// User-facing error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    NoMetadata,
    Transport,
    Cancellation,
}

impl AppError {
    /// Maps the error onto the taxonomy the UI reacts to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::InputValidation,
            AppError::NoMetadata => ErrorKind::NoMetadata,
            AppError::Cancelled => ErrorKind::Cancellation,
            AppError::Http(_)
            | AppError::Backend { .. }
            | AppError::Decode(_)
            | AppError::Io(_)
            | AppError::Task(_)
            | AppError::Url(_) => ErrorKind::Transport,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancellation
    }

    /// Text shown to the user.
    ///
    /// Validation and precondition errors carry their own wording. Backend failures
    /// surface the server-provided message verbatim; anything without one falls back
    /// to `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::NoMetadata | AppError::Cancelled => self.to_string(),
            AppError::Backend {
                message: Some(message), ..
            } if !message.trim().is_empty() => message.clone(),
            _ => generic.to_string(),
        }
    }
}
