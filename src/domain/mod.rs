// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod category;
pub mod comment;
pub mod fields;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// User Domain
pub use user::{
    is_admin, is_moderator, validate_email, validate_user, validate_username, Role, User,
};

// Catalog
pub use category::{validate_category, Category};
pub use genre::{validate_genre, Genre};
pub use title::{validate_title, Title, TitleDetails};

// Reviews & Comments
pub use comment::{validate_comment, Comment};
pub use review::{validate_review, Review};

// ============================================================================
// SHARED READ MODELS
// ============================================================================

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Current time at storage precision (microseconds)
///
/// Entities stamped with this read back unchanged after a store round trip.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// An entity paired with its author's username, as returned by read paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authored<T> {
    pub entity: T,
    pub author_username: String,
}

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A single input field is malformed or out of range
    #[error("{field}: {message}")]
    InvalidField { field: &'static str, message: String },

    /// A rule spanning several fields or records was violated
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Field the error is attached to, if any
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            DomainError::InvalidField { field, .. } => Some(field),
            DomainError::InvariantViolation(_) => None,
        }
    }
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
