// src/services/title_service.rs
//
// Title Service - Catalog entries
//
// CRITICAL RULES:
// - Genres and categories are referenced by slug; unknown slugs are field errors
// - The release year may not be after the current calendar year
// - Every read carries the computed rating

use std::sync::Arc;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::domain::{validate_title, DomainError, Title, TitleDetails};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::{CategoryRepository, GenreRepository, TitleFilter, TitleRepository};

#[derive(Debug, Clone, Default)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Genre slugs
    pub genre: Vec<String>,
    /// Category slug
    pub category: Option<String>,
}

/// Partial update. `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<Option<String>>,
}

fn calendar_year() -> i32 {
    Utc::now().year()
}

pub struct TitleService {
    title_repo: Arc<dyn TitleRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    current_year: fn() -> i32,
}

impl TitleService {
    pub fn new(
        title_repo: Arc<dyn TitleRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        genre_repo: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            title_repo,
            category_repo,
            genre_repo,
            current_year: calendar_year,
        }
    }

    /// Replace the calendar used by the year check
    pub fn with_current_year(mut self, current_year: fn() -> i32) -> Self {
        self.current_year = current_year;
        self
    }

    pub fn create_title(&self, actor: &Actor, request: CreateTitleRequest) -> AppResult<TitleDetails> {
        enforce(actor, Action::Create, Resource::Title)?;

        let mut title = Title::new(
            request.name,
            request.year,
            request.description.unwrap_or_default(),
        );
        title.category_id = self.resolve_category(request.category.as_deref())?;
        title.genre_ids = self.resolve_genres(&request.genre)?;

        validate_title(&title, (self.current_year)())?;
        self.title_repo.insert(&title)?;

        log::info!("{} created title {}", actor, title);
        self.get_title(actor, title.id)
    }

    /// Newest first
    pub fn list_titles(&self, actor: &Actor, filter: &TitleFilter) -> AppResult<Vec<TitleDetails>> {
        enforce(actor, Action::List, Resource::Title)?;
        self.title_repo.list_details(filter)
    }

    pub fn get_title(&self, actor: &Actor, title_id: Uuid) -> AppResult<TitleDetails> {
        enforce(actor, Action::Retrieve, Resource::Title)?;
        self.title_repo
            .get_details(title_id)?
            .ok_or_else(|| AppError::not_found("Title"))
    }

    pub fn update_title(
        &self,
        actor: &Actor,
        title_id: Uuid,
        request: UpdateTitleRequest,
    ) -> AppResult<TitleDetails> {
        enforce(actor, Action::Update, Resource::Title)?;

        let mut title = self
            .title_repo
            .get_by_id(title_id)?
            .ok_or_else(|| AppError::not_found("Title"))?;

        let category_id = match request.category {
            Some(slug) => Some(self.resolve_category(slug.as_deref())?),
            None => None,
        };
        let genre_ids = match request.genre {
            Some(slugs) => Some(self.resolve_genres(&slugs)?),
            None => None,
        };

        title.update(
            request.name,
            request.year,
            request.description,
            category_id,
            genre_ids,
        );

        validate_title(&title, (self.current_year)())?;
        self.title_repo.update(&title)?;

        self.get_title(actor, title.id)
    }

    pub fn delete_title(&self, actor: &Actor, title_id: Uuid) -> AppResult<()> {
        enforce(actor, Action::Delete, Resource::Title)?;
        self.title_repo.delete(title_id)?;
        log::info!("{} deleted title {}", actor, title_id);
        Ok(())
    }

    // ------------------------------------------------------------------------

    fn resolve_category(&self, slug: Option<&str>) -> AppResult<Option<Uuid>> {
        let Some(slug) = slug else {
            return Ok(None);
        };
        match self.category_repo.get_by_slug(slug)? {
            Some(category) => Ok(Some(category.id)),
            None => Err(DomainError::field("category", format!("Unknown category: {}", slug)).into()),
        }
    }

    /// Duplicate slugs collapse into one link
    fn resolve_genres(&self, slugs: &[String]) -> AppResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = self
                .genre_repo
                .get_by_slug(slug)?
                .ok_or_else(|| DomainError::field("genre", format!("Unknown genre: {}", slug)))?;
            if !ids.contains(&genre.id) {
                ids.push(genre.id);
            }
        }
        Ok(ids)
    }
}
