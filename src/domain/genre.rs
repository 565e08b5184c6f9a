// src/domain/genre.rs
//
// Genre Entity
//
// Genres tag titles many-to-many. Deleting a genre only removes the tags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::fields::{validate_name, validate_slug};
use crate::domain::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Genre {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn validate_genre(genre: &Genre) -> DomainResult<()> {
    validate_name(&genre.name)?;
    validate_slug(&genre.slug)
}
