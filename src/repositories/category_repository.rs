// src/repositories/category_repository.rs

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{decode_uuid, ConnectionPool};
use crate::domain::Category;
use crate::error::{AppError, AppResult};
use crate::repositories::like_pattern;

pub trait CategoryRepository: Send + Sync {
    fn insert(&self, category: &Category) -> AppResult<()>;
    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;
    /// Ordered by name. `search` matches a case-insensitive substring of the name.
    fn list(&self, search: Option<&str>) -> AppResult<Vec<Category>>;
    fn delete_by_slug(&self, slug: &str) -> AppResult<()>;
}

pub struct SqliteCategoryRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCategoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: decode_uuid(&row.get::<_, String>("id")?)?,
            name: row.get("name")?,
            slug: row.get("slug")?,
        })
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn insert(&self, category: &Category) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO categories (id, name, slug) VALUES (?1, ?2, ?3)",
            params![category.id.to_string(), category.name, category.slug],
        )?;

        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let conn = self.pool.get()?;

        let category = conn
            .query_row(
                "SELECT id, name, slug FROM categories WHERE slug = ?1",
                params![slug],
                Self::row_to_category,
            )
            .optional()?;

        Ok(category)
    }

    fn list(&self, search: Option<&str>) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, slug FROM categories
             WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\'
             ORDER BY name, slug",
        )?;

        let items = stmt
            .query_map(params![search.map(like_pattern)], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn delete_by_slug(&self, slug: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM categories WHERE slug = ?1", params![slug])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Category"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCategoryRepository::new(pool);
        repo.insert(&Category::new("Films".into(), "films".into())).unwrap();
        repo.insert(&Category::new("Books".into(), "books".into())).unwrap();
        repo.insert(&Category::new("Music".into(), "music".into())).unwrap();

        let found = repo.list(Some("OOK")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "books");

        let all: Vec<String> = repo.list(None).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(all, ["Books", "Films", "Music"]);
    }

    #[test]
    fn test_delete_by_slug() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCategoryRepository::new(pool);
        repo.insert(&Category::new("Films".into(), "films".into())).unwrap();

        repo.delete_by_slug("films").unwrap();
        assert!(repo.get_by_slug("films").unwrap().is_none());
        assert!(matches!(repo.delete_by_slug("films"), Err(AppError::NotFound(_))));
    }
}
