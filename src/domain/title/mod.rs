pub mod entity;
pub mod invariants;

pub use entity::{Title, TitleDetails};
pub use invariants::validate_title;
