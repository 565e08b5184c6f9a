// src/application/state.rs

use std::sync::Arc;

use crate::config::Settings;
use crate::db::{create_connection_pool, get_connection, get_database_path, initialize_database, ConnectionPool};
use crate::error::AppResult;
use crate::integrations::{build_mailer, Mailer};
use crate::repositories::*;
use crate::services::*;

/// Everything a request handler needs.
/// All fields are Arc-wrapped for thread-safe sharing across handlers.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub identity_service: Arc<IdentityService>,
    pub user_service: Arc<UserService>,
    pub category_service: Arc<CategoryService>,
    pub genre_service: Arc<GenreService>,
    pub title_service: Arc<TitleService>,
    pub review_service: Arc<ReviewService>,
    pub comment_service: Arc<CommentService>,
}

impl AppState {
    /// Open (and migrate) the configured database and wire the services
    pub fn build(settings: &Settings) -> AppResult<Self> {
        settings.validate()?;

        let db_path = match &settings.database.path {
            Some(path) => path.clone(),
            None => get_database_path()?,
        };
        let pool = Arc::new(create_connection_pool(&db_path, settings.database.pool_size)?);

        // Initialize schema (idempotent)
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }

        let mailer = build_mailer(&settings.mail)?;
        log::info!("Database ready at {}", db_path.display());

        Ok(Self::wire(pool, mailer, settings))
    }

    /// Wire repositories and services over an initialized pool
    pub fn wire(pool: Arc<ConnectionPool>, mailer: Arc<dyn Mailer>, settings: &Settings) -> Self {
        // REPOSITORIES
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let genre_repo: Arc<dyn GenreRepository> = Arc::new(SqliteGenreRepository::new(pool.clone()));
        let title_repo: Arc<dyn TitleRepository> = Arc::new(SqliteTitleRepository::new(pool.clone()));
        let review_repo: Arc<dyn ReviewRepository> =
            Arc::new(SqliteReviewRepository::new(pool.clone()));
        let comment_repo: Arc<dyn CommentRepository> =
            Arc::new(SqliteCommentRepository::new(pool.clone()));

        // SERVICES
        Self {
            identity_service: Arc::new(IdentityService::new(
                user_repo.clone(),
                mailer,
                &settings.auth,
            )),
            user_service: Arc::new(UserService::new(user_repo)),
            category_service: Arc::new(CategoryService::new(category_repo.clone())),
            genre_service: Arc::new(GenreService::new(genre_repo.clone())),
            title_service: Arc::new(TitleService::new(
                title_repo.clone(),
                category_repo,
                genre_repo,
            )),
            review_service: Arc::new(ReviewService::new(review_repo.clone(), title_repo.clone())),
            comment_service: Arc::new(CommentService::new(comment_repo, review_repo, title_repo)),
            pool,
        }
    }
}
