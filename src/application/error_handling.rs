// src/application/error_handling.rs
//
// Error Handling for Request Handlers
//
// ARCHITECTURE:
// - Maps internal errors → stable status + message
// - Field-level validation detail is preserved
// - Infrastructure failures are logged here and never leaked

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::error::AppError;

/// Standard error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    /// HTTP-style status code
    pub status: u16,
    pub message: String,
    /// Offending input field for validation errors
    pub field: Option<String>,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Invalid input or violated business rule (400)
    Validation,

    /// Identity already taken (409)
    Conflict,

    /// Resource not found (404)
    NotFound,

    /// Wrong or expired confirmation code (400)
    InvalidCredential,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// No valid bearer token (401)
    Unauthenticated,

    /// Anything else (500)
    Internal,
}

impl ErrorType {
    pub fn status(self) -> u16 {
        match self {
            ErrorType::Validation | ErrorType::InvalidCredential => 400,
            ErrorType::Conflict => 409,
            ErrorType::NotFound => 404,
            ErrorType::Forbidden => 403,
            ErrorType::Unauthenticated => 401,
            ErrorType::Internal => 500,
        }
    }
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_type,
            status: error_type.status(),
            message: message.into(),
            field: None,
            details: None,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::Domain(DomainError::InvalidField { field, message }) => {
                Self::validation(field, message)
            }

            AppError::Domain(DomainError::InvariantViolation(message)) => {
                Self::new(ErrorType::Validation, message)
            }

            AppError::Conflict(message) => Self::new(ErrorType::Conflict, message),

            e @ AppError::NotFound(_) => Self::new(ErrorType::NotFound, e.to_string()),

            e @ AppError::InvalidCredential => {
                Self::new(ErrorType::InvalidCredential, e.to_string())
            }

            e @ AppError::Forbidden => Self::new(ErrorType::Forbidden, e.to_string()),

            e @ AppError::Unauthenticated => Self::new(ErrorType::Unauthenticated, e.to_string()),

            AppError::Token(token_error) => {
                log::debug!("Token error at boundary: {}", token_error);
                Self::new(ErrorType::Unauthenticated, AppError::Unauthenticated.to_string())
            }

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::internal("Database operation failed")
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::internal("Database connection failed")
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::internal("Data serialization failed")
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::internal("File system operation failed")
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::internal("Internal error")
            }
        }
    }

    /// Create a field-level validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::new(ErrorType::Validation, message)
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            details: Some("Check logs for details".to_string()),
            ..Self::new(ErrorType::Internal, message)
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} {}: {}", self.status, field, self.message),
            None => write!(f, "{} {}", self.status, self.message),
        }
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}
