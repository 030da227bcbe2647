//! Error types for the coaching library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all coach operations.
#[derive(Error, Debug)]
pub enum CoachError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A candidate plan document failed strict schema validation
    #[error("Invalid plan document at '{field}': {reason}")]
    SchemaValidation { field: String, reason: String },
    /// The upstream completion call failed
    #[error(transparent)]
    Completion(#[from] CompletionError),
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CoachError {
    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Creates a schema validation error for a named field.
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of the upstream completion function.
///
/// Each variant maps to distinct user-facing guidance via
/// [`CompletionError::user_message`]; raw upstream internals are never shown
/// to the caller.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The request exceeded its deadline
    #[error("completion request timed out")]
    Timeout,
    /// The upstream rejected the request due to rate limiting
    #[error("completion request was rate limited")]
    RateLimited,
    /// The account has exhausted its quota
    #[error("completion quota exhausted")]
    QuotaExceeded,
    /// The upstream returned no usable content
    #[error("completion returned an empty response")]
    EmptyResponse,
    /// The upstream returned a non-success status
    #[error("completion API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Transport-level failure
    #[error("completion transport error: {0}")]
    Network(#[from] reqwest::Error),
    /// The response body did not match the expected shape
    #[error("malformed completion response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// A safe, user-facing message for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CompletionError::Timeout => {
                "The coach is taking longer than usual to respond. \
                 Please try a simpler request or try again in a moment."
            }
            CompletionError::RateLimited => {
                "Too many requests. Please wait a moment before trying again."
            }
            CompletionError::QuotaExceeded => {
                "The API quota has been exceeded. Please check your usage and billing."
            }
            CompletionError::EmptyResponse | CompletionError::InvalidResponse(_) => {
                "The coach returned an incomplete response. Please try again."
            }
            CompletionError::Api { .. } | CompletionError::Network(_) => {
                "The coach is temporarily unavailable. Please try again."
            }
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| CoachError::database_error(message, e))
    }
}

/// Result type alias for coach operations
pub type Result<T> = std::result::Result<T, CoachError>;
