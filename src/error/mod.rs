use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Record store errors.
///
/// Runtime read/write trouble is absorbed by the store implementations
/// (logged, degraded to an empty store or a dropped update), so these
/// surface only when a store cannot be opened at all.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Data directory unusable: {message}")]
    DataDir { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Shorthand for a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for backend API operations
pub type ApiResult<T> = Result<T, ApiError>;
