/// Shared error types and error handling.
pub mod errors;

pub use errors::{AppError, AppResult, ErrorSeverity};
