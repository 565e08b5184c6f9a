// src/application/commands/auth_commands.rs
//
// Signup and token exchange. Both are open to anonymous callers.

use crate::application::commands::CommandResult;
use crate::application::dto::*;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::services::{RegistrationRequest, TokenRequest};

/// Request a confirmation code by mail
pub fn signup(state: &AppState, dto: SignupDto) -> CommandResult<SignupDto> {
    let registration = state
        .identity_service
        .request_registration(RegistrationRequest {
            username: dto.username,
            email: dto.email,
        })
        .to_error_response()?;

    Ok(SignupDto::from(registration))
}

/// Exchange a confirmation code for a bearer token
pub fn obtain_token(state: &AppState, dto: TokenRequestDto) -> CommandResult<TokenDto> {
    let token = state
        .identity_service
        .exchange_token(TokenRequest {
            username: dto.username,
            confirmation_code: dto.confirmation_code,
        })
        .to_error_response()?;

    Ok(TokenDto::from(token))
}
