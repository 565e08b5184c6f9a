use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Genre};

/// A reviewable work (film, book, song, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    /// Internal immutable identifier
    pub id: Uuid,

    pub name: String,

    /// Release year, never in the future at write time
    pub year: i32,

    pub description: String,

    /// Optional classification; cleared when the category is deleted
    pub category_id: Option<Uuid>,

    /// Genre tags (many-to-many)
    pub genre_ids: Vec<Uuid>,
}

/// Read model: a title with its relations resolved and its rating computed
///
/// `rating` is the mean of all review scores, `None` without reviews. It is
/// derived on every read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub title: Title,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    pub rating: Option<f64>,
}

impl Title {
    pub fn new(name: String, year: i32, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            year,
            description,
            category_id: None,
            genre_ids: Vec::new(),
        }
    }

    /// Apply a partial update. `None` leaves a field untouched.
    pub fn update(
        &mut self,
        name: Option<String>,
        year: Option<i32>,
        description: Option<String>,
        category_id: Option<Option<Uuid>>,
        genre_ids: Option<Vec<Uuid>>,
    ) {
        if let Some(n) = name {
            self.name = n;
        }
        if let Some(y) = year {
            self.year = y;
        }
        if let Some(d) = description {
            self.description = d;
        }
        if let Some(c) = category_id {
            self.category_id = c;
        }
        if let Some(g) = genre_ids {
            self.genre_ids = g;
        }
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}
