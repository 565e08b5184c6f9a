// src/application/commands/catalog_commands.rs
//
// Categories and genres: list (with search), create, delete by slug

use crate::application::commands::{resolve_actor, CommandResult};
use crate::application::dto::*;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::services::{CreateCategoryRequest, CreateGenreRequest};

pub fn list_categories(
    state: &AppState,
    token: Option<&str>,
    search: Option<&str>,
) -> CommandResult<Vec<CategoryDto>> {
    let actor = resolve_actor(state, token)?;
    let categories = state
        .category_service
        .list_categories(&actor, search)
        .to_error_response()?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

pub fn create_category(
    state: &AppState,
    token: Option<&str>,
    dto: CategoryDto,
) -> CommandResult<CategoryDto> {
    let actor = resolve_actor(state, token)?;
    let category = state
        .category_service
        .create_category(
            &actor,
            CreateCategoryRequest {
                name: dto.name,
                slug: dto.slug,
            },
        )
        .to_error_response()?;
    Ok(CategoryDto::from(category))
}

pub fn delete_category(state: &AppState, token: Option<&str>, slug: &str) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    state
        .category_service
        .delete_category(&actor, slug)
        .to_error_response()
}

pub fn list_genres(
    state: &AppState,
    token: Option<&str>,
    search: Option<&str>,
) -> CommandResult<Vec<GenreDto>> {
    let actor = resolve_actor(state, token)?;
    let genres = state
        .genre_service
        .list_genres(&actor, search)
        .to_error_response()?;
    Ok(genres.into_iter().map(GenreDto::from).collect())
}

pub fn create_genre(state: &AppState, token: Option<&str>, dto: GenreDto) -> CommandResult<GenreDto> {
    let actor = resolve_actor(state, token)?;
    let genre = state
        .genre_service
        .create_genre(
            &actor,
            CreateGenreRequest {
                name: dto.name,
                slug: dto.slug,
            },
        )
        .to_error_response()?;
    Ok(GenreDto::from(genre))
}

pub fn delete_genre(state: &AppState, token: Option<&str>, slug: &str) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    state.genre_service.delete_genre(&actor, slug).to_error_response()
}
