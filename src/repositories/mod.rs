// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO authorization
// - Unique-index violations surface as `AppError::Database`; services decide what they mean
// - Explicit SQL only

pub mod category_repository;
pub mod comment_repository;
pub mod genre_repository;
pub mod review_repository;
pub mod title_repository;
pub mod user_repository;

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use comment_repository::{CommentRepository, SqliteCommentRepository};
pub use genre_repository::{GenreRepository, SqliteGenreRepository};
pub use review_repository::{ReviewRepository, SqliteReviewRepository};
pub use title_repository::{SqliteTitleRepository, TitleFilter, TitleRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

/// Escape `%`, `_` and `\` for use inside a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rock"), "%rock%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
