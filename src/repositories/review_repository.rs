// src/repositories/review_repository.rs
//
// Review persistence
//
// `ux_reviews_author_title` is the authoritative one-review-per-author-per-title
// guard; the review service pre-checks with `exists_for_author`.

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{decode_timestamp, decode_uuid, encode_timestamp, ConnectionPool};
use crate::domain::{Authored, Review};
use crate::error::{AppError, AppResult};

pub trait ReviewRepository: Send + Sync {
    fn insert(&self, review: &Review) -> AppResult<()>;
    /// Updates score and text only
    fn update(&self, review: &Review) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Authored<Review>>>;
    /// Oldest first
    fn list_by_title(&self, title_id: Uuid) -> AppResult<Vec<Authored<Review>>>;
    fn exists_for_author(&self, title_id: Uuid, author_id: Uuid) -> AppResult<bool>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteReviewRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReviewRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &Row) -> rusqlite::Result<Authored<Review>> {
        let review = Review {
            id: decode_uuid(&row.get::<_, String>("id")?)?,
            title_id: decode_uuid(&row.get::<_, String>("title_id")?)?,
            author_id: decode_uuid(&row.get::<_, String>("author_id")?)?,
            score: row.get("score")?,
            text: row.get("text")?,
            pub_date: decode_timestamp(&row.get::<_, String>("pub_date")?)?,
        };

        Ok(Authored {
            entity: review,
            author_username: row.get("author_username")?,
        })
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn insert(&self, review: &Review) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO reviews (id, title_id, author_id, score, text, pub_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                review.id.to_string(),
                review.title_id.to_string(),
                review.author_id.to_string(),
                review.score,
                review.text,
                encode_timestamp(&review.pub_date),
            ],
        )?;

        Ok(())
    }

    fn update(&self, review: &Review) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE reviews SET score = ?2, text = ?3 WHERE id = ?1",
            params![review.id.to_string(), review.score, review.text],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Review"));
        }
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Authored<Review>>> {
        let conn = self.pool.get()?;

        let review = conn
            .query_row(
                "SELECT r.id, r.title_id, r.author_id, r.score, r.text, r.pub_date,
                        u.username AS author_username
                 FROM reviews r JOIN users u ON u.id = r.author_id
                 WHERE r.id = ?1",
                params![id.to_string()],
                Self::row_to_review,
            )
            .optional()?;

        Ok(review)
    }

    fn list_by_title(&self, title_id: Uuid) -> AppResult<Vec<Authored<Review>>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT r.id, r.title_id, r.author_id, r.score, r.text, r.pub_date,
                    u.username AS author_username
             FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.title_id = ?1
             ORDER BY r.pub_date ASC, r.rowid ASC",
        )?;

        let reviews = stmt
            .query_map(params![title_id.to_string()], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn exists_for_author(&self, title_id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE title_id = ?1 AND author_id = ?2",
            params![title_id.to_string(), author_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM reviews WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Review"));
        }
        Ok(())
    }
}
