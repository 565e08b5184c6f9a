// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid confirmation code")]
    InvalidCredential,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Authentication credentials were not provided or are invalid")]
    Unauthenticated,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    /// True when the store rejected a write because of a UNIQUE or PRIMARY KEY index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            }
            _ => false,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Other(format!("UUID error: {}", err))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_detected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (slug TEXT NOT NULL UNIQUE);")
            .unwrap();
        conn.execute("INSERT INTO t (slug) VALUES ('a')", []).unwrap();

        let err = AppError::from(
            conn.execute("INSERT INTO t (slug) VALUES ('a')", [])
                .unwrap_err(),
        );
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_other_errors_are_not_unique_violations() {
        assert!(!AppError::not_found("Title").is_unique_violation());
        assert!(!AppError::Database(rusqlite::Error::QueryReturnedNoRows).is_unique_violation());
    }

    #[test]
    fn test_not_found_message_names_resource() {
        assert_eq!(AppError::not_found("Review").to_string(), "Review not found");
    }
}
