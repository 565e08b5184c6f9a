pub mod entity;
pub mod invariants;

pub use entity::{generate_confirmation_code, is_admin, is_moderator, Role, User};
pub use invariants::{validate_email, validate_user, validate_username, RESERVED_USERNAME};
