// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The request boundary above the services
// - Resolves bearer tokens into actors
// - Translates between DTOs and service requests
// - Maps every error to an `ErrorResponse`

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
