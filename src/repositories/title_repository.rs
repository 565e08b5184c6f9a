// src/repositories/title_repository.rs
//
// Title persistence
//
// Titles own their genre links (`title_genres`): writes replace the whole set
// inside one transaction. The rating is computed by the read queries with
// AVG over `reviews` and is never written.

use std::sync::Arc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{decode_uuid, ConnectionPool};
use crate::domain::{Category, Genre, Title, TitleDetails};
use crate::error::{AppError, AppResult};

/// Title list filters; `None` disables a filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    /// Genre slug
    pub genre: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Exact year
    pub year: Option<i32>,
    /// Case-sensitive substring of the name
    pub name: Option<String>,
}

pub trait TitleRepository: Send + Sync {
    fn insert(&self, title: &Title) -> AppResult<()>;
    fn update(&self, title: &Title) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Title>>;
    fn get_details(&self, id: Uuid) -> AppResult<Option<TitleDetails>>;
    /// Ordered by year, newest first
    fn list_details(&self, filter: &TitleFilter) -> AppResult<Vec<TitleDetails>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
}

const DETAILS_SELECT: &str = "
    SELECT t.id, t.name, t.year, t.description, t.category_id,
           c.name AS category_name, c.slug AS category_slug,
           (SELECT AVG(r.score) FROM reviews r WHERE r.title_id = t.id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id";

pub struct SqliteTitleRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteTitleRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_title(row: &Row) -> rusqlite::Result<Title> {
        let category_id: Option<String> = row.get("category_id")?;

        Ok(Title {
            id: decode_uuid(&row.get::<_, String>("id")?)?,
            name: row.get("name")?,
            year: row.get("year")?,
            description: row.get("description")?,
            category_id: category_id.as_deref().map(decode_uuid).transpose()?,
            genre_ids: Vec::new(),
        })
    }

    /// Genres are attached afterwards by `load_genres`
    fn row_to_details(row: &Row) -> rusqlite::Result<TitleDetails> {
        let title = Self::row_to_title(row)?;

        let category = match title.category_id {
            Some(id) => Some(Category {
                id,
                name: row.get("category_name")?,
                slug: row.get("category_slug")?,
            }),
            None => None,
        };

        Ok(TitleDetails {
            title,
            category,
            genres: Vec::new(),
            rating: row.get("rating")?,
        })
    }

    fn load_genres(conn: &Connection, title_id: Uuid) -> AppResult<Vec<Genre>> {
        let mut stmt = conn.prepare_cached(
            "SELECT g.id, g.name, g.slug
             FROM genres g
             JOIN title_genres tg ON tg.genre_id = g.id
             WHERE tg.title_id = ?1
             ORDER BY g.name",
        )?;

        let genres = stmt
            .query_map(params![title_id.to_string()], |row| {
                Ok(Genre {
                    id: decode_uuid(&row.get::<_, String>("id")?)?,
                    name: row.get("name")?,
                    slug: row.get("slug")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    fn attach_genres(conn: &Connection, details: &mut TitleDetails) -> AppResult<()> {
        details.genres = Self::load_genres(conn, details.title.id)?;
        details.title.genre_ids = details.genres.iter().map(|g| g.id).collect();
        Ok(())
    }

    fn write_genre_links(conn: &Connection, title: &Title) -> AppResult<()> {
        conn.execute(
            "DELETE FROM title_genres WHERE title_id = ?1",
            params![title.id.to_string()],
        )?;

        let mut stmt = conn.prepare_cached(
            "INSERT OR IGNORE INTO title_genres (title_id, genre_id) VALUES (?1, ?2)",
        )?;
        for genre_id in &title.genre_ids {
            stmt.execute(params![title.id.to_string(), genre_id.to_string()])?;
        }

        Ok(())
    }
}

impl TitleRepository for SqliteTitleRepository {
    fn insert(&self, title: &Title) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO titles (id, name, year, description, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                title.id.to_string(),
                title.name,
                title.year,
                title.description,
                title.category_id.map(|id| id.to_string()),
            ],
        )?;
        Self::write_genre_links(&tx, title)?;

        tx.commit()?;
        Ok(())
    }

    fn update(&self, title: &Title) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let rows_affected = tx.execute(
            "UPDATE titles SET name = ?2, year = ?3, description = ?4, category_id = ?5
             WHERE id = ?1",
            params![
                title.id.to_string(),
                title.name,
                title.year,
                title.description,
                title.category_id.map(|id| id.to_string()),
            ],
        )?;
        if rows_affected == 0 {
            return Err(AppError::not_found("Title"));
        }
        Self::write_genre_links(&tx, title)?;

        tx.commit()?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Title>> {
        Ok(self.get_details(id)?.map(|details| details.title))
    }

    fn get_details(&self, id: Uuid) -> AppResult<Option<TitleDetails>> {
        let conn = self.pool.get()?;

        let details = conn
            .query_row(
                &format!("{} WHERE t.id = ?1", DETAILS_SELECT),
                params![id.to_string()],
                Self::row_to_details,
            )
            .optional()?;

        match details {
            Some(mut details) => {
                Self::attach_genres(&conn, &mut details)?;
                Ok(Some(details))
            }
            None => Ok(None),
        }
    }

    fn list_details(&self, filter: &TitleFilter) -> AppResult<Vec<TitleDetails>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "{}
             WHERE (?1 IS NULL OR EXISTS (
                        SELECT 1 FROM title_genres tg
                        JOIN genres g ON g.id = tg.genre_id
                        WHERE tg.title_id = t.id AND g.slug = ?1))
               AND (?2 IS NULL OR c.slug = ?2)
               AND (?3 IS NULL OR t.year = ?3)
               AND (?4 IS NULL OR instr(t.name, ?4) > 0)
             ORDER BY t.year DESC, t.name",
            DETAILS_SELECT
        ))?;

        let mut titles = stmt
            .query_map(
                params![filter.genre, filter.category, filter.year, filter.name],
                Self::row_to_details,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        for details in &mut titles {
            Self::attach_genres(&conn, details)?;
        }

        Ok(titles)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM titles WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Title"));
        }
        Ok(())
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM titles WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
