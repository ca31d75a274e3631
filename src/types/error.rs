//! Error types for fishdex
//!
//! Every core operation returns exactly one of these. Storage causes are kept
//! in the error for operator logs but never rendered to clients.

use hyper::StatusCode;

/// Main error type for fishdex operations
#[derive(Debug, thiserror::Error)]
pub enum FishdexError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body is missing a field or has the wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store unreachable or rejected the operation
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FishdexError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Database(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::Validation(_) | Self::BadRequest(_) => self.to_string(),
            Self::Database(_) => "Storage unavailable".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// True for failures that indicate a server-side problem
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<std::io::Error> for FishdexError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for FishdexError {
    fn from(err: serde_json::Error) -> Self {
        // Missing fields and wrong types are data errors; anything else is syntax
        if err.is_data() {
            Self::Validation(err.to_string())
        } else {
            Self::BadRequest(format!("JSON error: {}", err))
        }
    }
}

impl From<hyper::Error> for FishdexError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for FishdexError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for fishdex operations
pub type Result<T> = std::result::Result<T, FishdexError>;
