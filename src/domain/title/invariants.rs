use super::entity::Title;
use crate::domain::fields::validate_name;
use crate::domain::{DomainError, DomainResult};

/// Validates all Title invariants
///
/// `current_year` is the calendar year at write time; it is passed in so
/// that the check is deterministic under test.
pub fn validate_title(title: &Title, current_year: i32) -> DomainResult<()> {
    validate_name(&title.name)?;
    validate_year(title.year, current_year)?;
    Ok(())
}

/// Titles that have not been released yet cannot be added
fn validate_year(year: i32, current_year: i32) -> DomainResult<()> {
    if year > current_year {
        return Err(DomainError::field(
            "year",
            format!("Year {} is in the future (current year is {})", year, current_year),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for Title domain:
///
/// 1. Name is non-blank and at most 256 characters
/// 2. Year is not after the current calendar year
/// 3. Category is optional and survives category deletion as `None`
/// 4. Rating is never stored
