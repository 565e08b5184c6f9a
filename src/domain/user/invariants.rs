use std::sync::OnceLock;

use regex::Regex;

use super::entity::User;
use crate::domain::fields::{max_chars, require_text};
use crate::domain::{DomainError, DomainResult};

/// Username reserved for the self-service profile route
pub const RESERVED_USERNAME: &str = "me";

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PERSON_NAME_MAX_LEN: usize = 150;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
    })
}

/// Letters, digits and `@ . + - _`, at most 150 characters, never `me`
pub fn validate_username(username: &str) -> DomainResult<()> {
    require_text("username", username)?;
    max_chars("username", username, USERNAME_MAX_LEN)?;
    if username == RESERVED_USERNAME {
        return Err(DomainError::field("username", "This username is reserved"));
    }
    if !username_pattern().is_match(username) {
        return Err(DomainError::field(
            "username",
            "Username may contain only letters, digits and @/./+/-/_ characters",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> DomainResult<()> {
    require_text("email", email)?;
    max_chars("email", email, EMAIL_MAX_LEN)?;
    if !email_pattern().is_match(email) {
        return Err(DomainError::field("email", "Enter a valid email address"));
    }
    Ok(())
}

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_username(&user.username)?;
    validate_email(&user.email)?;
    if let Some(first) = &user.first_name {
        max_chars("first_name", first, PERSON_NAME_MAX_LEN)?;
    }
    if let Some(last) = &user.last_name {
        max_chars("last_name", last, PERSON_NAME_MAX_LEN)?;
    }
    Ok(())
}
