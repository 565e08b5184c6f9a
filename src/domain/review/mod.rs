pub mod entity;
pub mod invariants;

pub use entity::Review;
pub use invariants::{validate_review, MAX_SCORE, MIN_SCORE};
