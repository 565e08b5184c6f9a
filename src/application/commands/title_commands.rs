// src/application/commands/title_commands.rs

use crate::application::commands::{parse_id, resolve_actor, CommandResult};
use crate::application::dto::*;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::repositories::TitleFilter;
use crate::services::{CreateTitleRequest, UpdateTitleRequest};

pub fn list_titles(
    state: &AppState,
    token: Option<&str>,
    query: TitleQueryDto,
) -> CommandResult<Vec<TitleDto>> {
    let actor = resolve_actor(state, token)?;
    let titles = state
        .title_service
        .list_titles(&actor, &TitleFilter::from(query))
        .to_error_response()?;
    Ok(titles.into_iter().map(TitleDto::from).collect())
}

pub fn get_title(state: &AppState, token: Option<&str>, title_id: &str) -> CommandResult<TitleDto> {
    let actor = resolve_actor(state, token)?;
    let id = parse_id("Title", title_id)?;
    let details = state.title_service.get_title(&actor, id).to_error_response()?;
    Ok(TitleDto::from(details))
}

pub fn create_title(state: &AppState, token: Option<&str>, dto: CreateTitleDto) -> CommandResult<TitleDto> {
    let actor = resolve_actor(state, token)?;
    let request = CreateTitleRequest {
        name: dto.name,
        year: dto.year,
        description: dto.description,
        genre: dto.genre,
        category: dto.category,
    };
    let details = state
        .title_service
        .create_title(&actor, request)
        .to_error_response()?;
    Ok(TitleDto::from(details))
}

pub fn update_title(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    dto: UpdateTitleDto,
) -> CommandResult<TitleDto> {
    let actor = resolve_actor(state, token)?;
    let id = parse_id("Title", title_id)?;
    let request = UpdateTitleRequest {
        name: dto.name,
        year: dto.year,
        description: dto.description,
        genre: dto.genre,
        category: dto.category,
    };
    let details = state
        .title_service
        .update_title(&actor, id, request)
        .to_error_response()?;
    Ok(TitleDto::from(details))
}

pub fn delete_title(state: &AppState, token: Option<&str>, title_id: &str) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    let id = parse_id("Title", title_id)?;
    state.title_service.delete_title(&actor, id).to_error_response()
}
