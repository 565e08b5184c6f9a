// src/domain/category.rs
//
// Category Entity
//
// Categories classify titles ("films", "books", ...). A title points at no
// more than one category; deleting the category leaves the title uncategorized.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::fields::{validate_name, validate_slug};
use crate::domain::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Unique URL-safe identifier
    pub slug: String,
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn validate_category(category: &Category) -> DomainResult<()> {
    validate_name(&category.name)?;
    validate_slug(&category.slug)
}
