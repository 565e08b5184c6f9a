// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Every public operation takes the acting `Actor` first and runs the
// authorization policy before touching the store.

pub mod category_service;
pub mod comment_service;
pub mod genre_service;
pub mod identity_service;
pub mod review_service;
pub mod title_service;
pub mod user_service;

// Re-export all services and their types
pub use identity_service::{
    BearerToken,
    Claims,
    IdentityService,
    Registration,
    RegistrationRequest,
    TokenIssuer,
    TokenRequest,
};

pub use user_service::{
    CreateUserRequest,
    UpdateUserRequest,
    UserService,
};

pub use category_service::{
    CategoryService,
    CreateCategoryRequest,
};

pub use genre_service::{
    CreateGenreRequest,
    GenreService,
};

pub use title_service::{
    CreateTitleRequest,
    TitleService,
    UpdateTitleRequest,
};

pub use review_service::{
    CreateReviewRequest,
    ReviewService,
    UpdateReviewRequest,
};

pub use comment_service::{
    CommentService,
    CreateCommentRequest,
    UpdateCommentRequest,
};
