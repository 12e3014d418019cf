use thiserror::Error;

/// Unified error type used across the whole bot.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage backend unreachable or an operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Bad user input. Always recoverable by re-prompting.
    #[error("validation error: {0}")]
    Validation(String),

    /// A requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Telegram API call failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Severity of an error, used to pick the log level at the handler boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// User input errors, missing records.
    Low,
    /// Transient transport failures.
    Medium,
    /// Backend failures, broken configuration.
    High,
}

impl AppError {
    /// Message that is safe to show to the user.
    ///
    /// Validation and not-found messages are written for the user and pass
    /// through verbatim; everything else collapses into a generic notice so
    /// backend details never leak into the chat.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Storage(_) => "❌ Database error. Please try again.",
            AppError::Validation(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Transport(_) => "❌ Could not reach Telegram. Please try again.",
            AppError::Configuration(_) => "❌ The bot is misconfigured.",
        }
    }

    /// Severity of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Transport(_) => ErrorSeverity::Medium,
            AppError::Storage(_) | AppError::Configuration(_) => ErrorSeverity::High,
        }
    }

    /// Helper for validation errors.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// Helper for not-found errors. The message is shown to the user as is.
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        AppError::NotFound(message.into())
    }

    /// Helper for storage errors.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        AppError::Storage(message.into())
    }

    /// Helper for configuration errors.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        AppError::Storage(error.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        AppError::Storage(error.to_string())
    }
}

impl From<teloxide::RequestError> for AppError {
    fn from(error: teloxide::RequestError) -> Self {
        AppError::Transport(error.to_string())
    }
}

/// Result alias used across the whole bot.
pub type AppResult<T> = Result<T, AppError>;
