// src/services/genre_service.rs
//
// Genre Service
//
// Deleting a genre only unlinks it from its titles.

use std::sync::Arc;

use crate::domain::{validate_genre, DomainError, Genre};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::GenreRepository;

#[derive(Debug, Clone)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

pub struct GenreService {
    genre_repo: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(genre_repo: Arc<dyn GenreRepository>) -> Self {
        Self { genre_repo }
    }

    pub fn create_genre(&self, actor: &Actor, request: CreateGenreRequest) -> AppResult<Genre> {
        enforce(actor, Action::Create, Resource::Genre)?;

        let genre = Genre::new(request.name, request.slug);
        validate_genre(&genre)?;

        let duplicate = || DomainError::field("slug", "A genre with this slug already exists");
        if self.genre_repo.get_by_slug(&genre.slug)?.is_some() {
            return Err(duplicate().into());
        }
        match self.genre_repo.insert(&genre) {
            Err(e) if e.is_unique_violation() => return Err(duplicate().into()),
            other => other?,
        }

        log::info!("{} created genre {}", actor, genre.slug);
        Ok(genre)
    }

    pub fn list_genres(&self, actor: &Actor, search: Option<&str>) -> AppResult<Vec<Genre>> {
        enforce(actor, Action::List, Resource::Genre)?;
        self.genre_repo.list(search.filter(|s| !s.is_empty()))
    }

    pub fn delete_genre(&self, actor: &Actor, slug: &str) -> AppResult<()> {
        enforce(actor, Action::Delete, Resource::Genre)?;
        self.genre_repo.delete_by_slug(slug)?;
        log::info!("{} deleted genre {}", actor, slug);
        Ok(())
    }
}
