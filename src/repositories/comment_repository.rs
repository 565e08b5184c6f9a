// src/repositories/comment_repository.rs

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{decode_timestamp, decode_uuid, encode_timestamp, ConnectionPool};
use crate::domain::{Authored, Comment};
use crate::error::{AppError, AppResult};

pub trait CommentRepository: Send + Sync {
    fn insert(&self, comment: &Comment) -> AppResult<()>;
    /// Updates text only
    fn update(&self, comment: &Comment) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Authored<Comment>>>;
    /// Newest first
    fn list_by_review(&self, review_id: Uuid) -> AppResult<Vec<Authored<Comment>>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteCommentRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCommentRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_comment(row: &Row) -> rusqlite::Result<Authored<Comment>> {
        Ok(Authored {
            entity: Comment {
                id: decode_uuid(&row.get::<_, String>("id")?)?,
                review_id: decode_uuid(&row.get::<_, String>("review_id")?)?,
                author_id: decode_uuid(&row.get::<_, String>("author_id")?)?,
                text: row.get("text")?,
                pub_date: decode_timestamp(&row.get::<_, String>("pub_date")?)?,
            },
            author_username: row.get("author_username")?,
        })
    }
}

impl CommentRepository for SqliteCommentRepository {
    fn insert(&self, comment: &Comment) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO comments (id, review_id, author_id, text, pub_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id.to_string(),
                comment.review_id.to_string(),
                comment.author_id.to_string(),
                comment.text,
                encode_timestamp(&comment.pub_date),
            ],
        )?;

        Ok(())
    }

    fn update(&self, comment: &Comment) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE comments SET text = ?2 WHERE id = ?1",
            params![comment.id.to_string(), comment.text],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Comment"));
        }
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Authored<Comment>>> {
        let conn = self.pool.get()?;

        let comment = conn
            .query_row(
                "SELECT c.id, c.review_id, c.author_id, c.text, c.pub_date,
                        u.username AS author_username
                 FROM comments c JOIN users u ON u.id = c.author_id
                 WHERE c.id = ?1",
                params![id.to_string()],
                Self::row_to_comment,
            )
            .optional()?;

        Ok(comment)
    }

    fn list_by_review(&self, review_id: Uuid) -> AppResult<Vec<Authored<Comment>>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.review_id, c.author_id, c.text, c.pub_date,
                    u.username AS author_username
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.review_id = ?1
             ORDER BY c.pub_date DESC, c.rowid DESC",
        )?;

        let comments = stmt
            .query_map(params![review_id.to_string()], Self::row_to_comment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM comments WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Comment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use crate::domain::{Review, Title, User};
    use crate::repositories::{
        ReviewRepository, SqliteReviewRepository, SqliteTitleRepository, SqliteUserRepository,
        TitleRepository, UserRepository,
    };
    use chrono::Duration;

    #[test]
    fn test_comments_newest_first_and_cascade_with_review() {
        let (_dir, pool) = test_pool();
        let title = Title::new("Mirror".into(), 1975, String::new());
        SqliteTitleRepository::new(pool.clone()).insert(&title).unwrap();
        let author = User::new("dana".into(), "dana@example.com".into());
        SqliteUserRepository::new(pool.clone()).insert(&author).unwrap();
        let reviews = SqliteReviewRepository::new(pool.clone());
        let review = Review::new(title.id, author.id, 10, "Masterpiece".into());
        reviews.insert(&review).unwrap();

        let repo = SqliteCommentRepository::new(pool);
        let first = Comment::new(review.id, author.id, "first".into());
        let mut second = Comment::new(review.id, author.id, "second".into());
        second.pub_date = first.pub_date + Duration::seconds(1);
        repo.insert(&first).unwrap();
        repo.insert(&second).unwrap();

        let texts: Vec<String> = repo
            .list_by_review(review.id)
            .unwrap()
            .into_iter()
            .map(|c| c.entity.text)
            .collect();
        assert_eq!(texts, ["second", "first"]);

        reviews.delete(review.id).unwrap();
        assert!(repo.list_by_review(review.id).unwrap().is_empty());
        assert!(repo.get_by_id(first.id).unwrap().is_none());
    }
}
