// src/lib.rs
// ReviewHub - Title catalog and review platform
//
// Architecture:
// - Domain-centric: validation rules live in `domain`
// - Explicit authorization: every service call runs `permissions::enforce`
// - Repositories are dumb mappers over SQLite; unique indexes back every uniqueness rule
// - Application layer: token resolution, DTOs, error mapping

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod permissions;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_category,
    validate_comment,
    validate_genre,
    validate_review,
    validate_title,
    validate_user,
    Authored,
    Category,
    Comment,
    DomainError,
    Genre,
    Review,
    Role,
    Title,
    TitleDetails,
    User,
};

// ============================================================================
// PUBLIC API - Errors, Config, Policy
// ============================================================================

pub use config::Settings;
pub use error::{AppError, AppResult};
pub use permissions::{authorize, enforce, Action, Actor, Decision, Resource};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CategoryRepository,
    CommentRepository,
    GenreRepository,
    ReviewRepository,
    SqliteCategoryRepository,
    SqliteCommentRepository,
    SqliteGenreRepository,
    SqliteReviewRepository,
    SqliteTitleRepository,
    SqliteUserRepository,
    TitleFilter,
    TitleRepository,
    UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CategoryService,
    CommentService,
    GenreService,
    IdentityService,
    ReviewService,
    TitleService,
    UserService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{LogMailer, MailMessage, Mailer, SmtpMailer};
