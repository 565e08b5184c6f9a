// src/repositories/genre_repository.rs

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{decode_uuid, ConnectionPool};
use crate::domain::Genre;
use crate::error::{AppError, AppResult};
use crate::repositories::like_pattern;

pub trait GenreRepository: Send + Sync {
    fn insert(&self, genre: &Genre) -> AppResult<()>;
    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Genre>>;
    /// Ordered by name. `search` matches a case-insensitive substring of the name.
    fn list(&self, search: Option<&str>) -> AppResult<Vec<Genre>>;
    fn delete_by_slug(&self, slug: &str) -> AppResult<()>;
}

pub struct SqliteGenreRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGenreRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_genre(row: &Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: decode_uuid(&row.get::<_, String>("id")?)?,
            name: row.get("name")?,
            slug: row.get("slug")?,
        })
    }
}

impl GenreRepository for SqliteGenreRepository {
    fn insert(&self, genre: &Genre) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO genres (id, name, slug) VALUES (?1, ?2, ?3)",
            params![genre.id.to_string(), genre.name, genre.slug],
        )?;

        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Genre>> {
        let conn = self.pool.get()?;

        let genre = conn
            .query_row(
                "SELECT id, name, slug FROM genres WHERE slug = ?1",
                params![slug],
                Self::row_to_genre,
            )
            .optional()?;

        Ok(genre)
    }

    fn list(&self, search: Option<&str>) -> AppResult<Vec<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, slug FROM genres
             WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\'
             ORDER BY name, slug",
        )?;

        let items = stmt
            .query_map(params![search.map(like_pattern)], Self::row_to_genre)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn delete_by_slug(&self, slug: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM genres WHERE slug = ?1", params![slug])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Genre"));
        }
        Ok(())
    }
}
