// src/services/category_service.rs
//
// Category Service
//
// Categories are created, listed and deleted; they are never edited.
// Deleting one leaves its titles uncategorized.

use std::sync::Arc;

use crate::domain::{validate_category, Category, DomainError};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::CategoryRepository;

#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    pub fn create_category(
        &self,
        actor: &Actor,
        request: CreateCategoryRequest,
    ) -> AppResult<Category> {
        enforce(actor, Action::Create, Resource::Category)?;

        let category = Category::new(request.name, request.slug);
        validate_category(&category)?;

        if self.category_repo.get_by_slug(&category.slug)?.is_some() {
            return Err(duplicate_slug().into());
        }
        self.category_repo.insert(&category).map_err(|e| {
            if e.is_unique_violation() {
                AppError::Domain(duplicate_slug())
            } else {
                e
            }
        })?;

        log::info!("{} created category {}", actor, category.slug);
        Ok(category)
    }

    /// Ordered by name; `search` matches a name substring, ignoring case
    pub fn list_categories(&self, actor: &Actor, search: Option<&str>) -> AppResult<Vec<Category>> {
        enforce(actor, Action::List, Resource::Category)?;
        self.category_repo.list(search.filter(|s| !s.is_empty()))
    }

    pub fn delete_category(&self, actor: &Actor, slug: &str) -> AppResult<()> {
        enforce(actor, Action::Delete, Resource::Category)?;
        self.category_repo.delete_by_slug(slug)?;
        log::info!("{} deleted category {}", actor, slug);
        Ok(())
    }
}

fn duplicate_slug() -> DomainError {
    DomainError::field("slug", "A category with this slug already exists")
}
