// src/domain/fields.rs
//
// Field-level validators shared by several entities.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{DomainError, DomainResult};

pub const NAME_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 50;

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"))
}

/// Non-blank text
pub fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::field(field, "This field may not be blank"));
    }
    Ok(())
}

/// Length counted in characters, not bytes
pub fn max_chars(field: &'static str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::field(
            field,
            format!("Ensure this field has no more than {} characters", max),
        ));
    }
    Ok(())
}

/// Catalog entry display name: non-blank, at most 256 characters
pub fn validate_name(value: &str) -> DomainResult<()> {
    require_text("name", value)?;
    max_chars("name", value, NAME_MAX_LEN)
}

/// URL-safe identifier: ASCII letters, digits, `-` and `_`, at most 50 characters
pub fn validate_slug(value: &str) -> DomainResult<()> {
    require_text("slug", value)?;
    max_chars("slug", value, SLUG_MAX_LEN)?;
    if !slug_pattern().is_match(value) {
        return Err(DomainError::field(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}
