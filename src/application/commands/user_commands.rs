// src/application/commands/user_commands.rs
//
// User directory (by username) and the `me` profile

use crate::application::commands::{resolve_actor, CommandResult};
use crate::application::dto::*;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::domain::Role;
use crate::services::{CreateUserRequest, UpdateUserRequest};

fn parse_role(raw: Option<String>) -> CommandResult<Option<Role>> {
    raw.map(|r| r.parse::<Role>().map_err(|e| ErrorResponse::validation("role", e)))
        .transpose()
}

fn update_request(dto: UpdateUserDto) -> CommandResult<UpdateUserRequest> {
    Ok(UpdateUserRequest {
        role: parse_role(dto.role)?,
        username: dto.username,
        email: dto.email,
        first_name: dto.first_name,
        last_name: dto.last_name,
        bio: dto.bio,
    })
}

pub fn list_users(state: &AppState, token: Option<&str>) -> CommandResult<Vec<UserDto>> {
    let actor = resolve_actor(state, token)?;
    let users = state.user_service.list_users(&actor).to_error_response()?;
    Ok(users.into_iter().map(UserDto::from).collect())
}

pub fn create_user(state: &AppState, token: Option<&str>, dto: CreateUserDto) -> CommandResult<UserDto> {
    let actor = resolve_actor(state, token)?;
    let request = CreateUserRequest {
        role: parse_role(dto.role)?,
        username: dto.username,
        email: dto.email,
        first_name: dto.first_name,
        last_name: dto.last_name,
        bio: dto.bio,
    };
    let user = state.user_service.create_user(&actor, request).to_error_response()?;
    Ok(UserDto::from(user))
}

pub fn get_user(state: &AppState, token: Option<&str>, username: &str) -> CommandResult<UserDto> {
    let actor = resolve_actor(state, token)?;
    let user = state.user_service.get_user(&actor, username).to_error_response()?;
    Ok(UserDto::from(user))
}

pub fn update_user(
    state: &AppState,
    token: Option<&str>,
    username: &str,
    dto: UpdateUserDto,
) -> CommandResult<UserDto> {
    let actor = resolve_actor(state, token)?;
    let user = state
        .user_service
        .update_user(&actor, username, update_request(dto)?)
        .to_error_response()?;
    Ok(UserDto::from(user))
}

pub fn delete_user(state: &AppState, token: Option<&str>, username: &str) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    state.user_service.delete_user(&actor, username).to_error_response()
}

pub fn get_me(state: &AppState, token: Option<&str>) -> CommandResult<UserDto> {
    let actor = resolve_actor(state, token)?;
    let me = state.user_service.get_me(&actor).to_error_response()?;
    Ok(UserDto::from(me))
}

/// A `role` in the body is accepted and ignored
pub fn update_me(state: &AppState, token: Option<&str>, dto: UpdateUserDto) -> CommandResult<UserDto> {
    let actor = resolve_actor(state, token)?;
    let me = state
        .user_service
        .update_me(&actor, update_request(dto)?)
        .to_error_response()?;
    Ok(UserDto::from(me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::test_support::Harness;

    #[test]
    fn test_unknown_role_is_field_error() {
        let harness = Harness::new();
        let admin = harness.login_as("root", Role::Admin);

        let err = create_user(
            &harness.state,
            Some(&admin),
            CreateUserDto {
                username: "eve".into(),
                email: "eve@example.com".into(),
                role: Some("overlord".into()),
                ..CreateUserDto::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.field.as_deref(), Some("role"));
    }

    #[test]
    fn test_me_ignores_role() {
        let harness = Harness::new();
        let alice = harness.login_as("alice", Role::User);

        let me = update_me(
            &harness.state,
            Some(&alice),
            UpdateUserDto {
                role: Some("admin".into()),
                bio: Some(Some("Film buff".into())),
                ..UpdateUserDto::default()
            },
        )
        .unwrap();
        assert_eq!(me.role, "user");
        assert_eq!(me.bio.as_deref(), Some("Film buff"));

        let err = list_users(&harness.state, Some(&alice)).unwrap_err();
        assert_eq!(err.status, 403);
    }
}
