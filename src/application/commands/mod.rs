// src/application/commands/mod.rs
//
// Request Handlers
//
// ARCHITECTURE:
// - Handlers are thin adapters between callers and services
// - Handlers accept an optional bearer token plus DTOs, return DTOs
// - Handlers convert every error into an `ErrorResponse`
// - Handlers NEVER contain business logic

pub mod auth_commands;
pub mod catalog_commands;
pub mod review_commands;
pub mod title_commands;
pub mod user_commands;

pub use auth_commands::*;
pub use catalog_commands::*;
pub use review_commands::*;
pub use title_commands::*;
pub use user_commands::*;

use uuid::Uuid;

use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::error::AppError;
use crate::permissions::Actor;

/// Result type of every handler
pub type CommandResult<T> = Result<T, ErrorResponse>;

/// Resolve an `Authorization` value (with or without the `Bearer ` prefix)
pub(crate) fn resolve_actor(state: &AppState, token: Option<&str>) -> CommandResult<Actor> {
    let token = token
        .map(|raw| raw.trim())
        .map(|raw| raw.strip_prefix("Bearer ").unwrap_or(raw).trim())
        .filter(|raw| !raw.is_empty());

    state.identity_service.authenticate(token).to_error_response()
}

/// Path ids that do not parse cannot name an existing resource
pub(crate) fn parse_id(resource: &str, raw: &str) -> CommandResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ErrorResponse::from_app_error(AppError::not_found(resource)))
}
