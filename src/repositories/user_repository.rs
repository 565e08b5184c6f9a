// src/repositories/user_repository.rs
//
// User persistence
//
// Usernames match exactly, emails case-insensitively (the unique index on
// `email` is declared COLLATE NOCASE).

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{decode_timestamp, decode_uuid, encode_timestamp, ConnectionPool};
use crate::domain::{Role, User};
use crate::error::{AppError, AppResult};

pub trait UserRepository: Send + Sync {
    fn insert(&self, user: &User) -> AppResult<()>;
    fn update(&self, user: &User) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    fn get_by_username_and_email(&self, username: &str, email: &str) -> AppResult<Option<User>>;
    fn list_all(&self) -> AppResult<Vec<User>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, bio, role,
    is_staff, is_superuser, confirmation_code, confirmation_code_issued_at, date_joined";

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let role_str: String = row.get("role")?;
        let role = role_str
            .parse::<Role>()
            .map_err(|_| rusqlite::Error::InvalidQuery)?;

        let issued_at: Option<String> = row.get("confirmation_code_issued_at")?;

        Ok(User {
            id: decode_uuid(&row.get::<_, String>("id")?)?,
            username: row.get("username")?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            bio: row.get("bio")?,
            role,
            is_staff: row.get("is_staff")?,
            is_superuser: row.get("is_superuser")?,
            confirmation_code: row.get("confirmation_code")?,
            confirmation_code_issued_at: issued_at.as_deref().map(decode_timestamp).transpose()?,
            date_joined: decode_timestamp(&row.get::<_, String>("date_joined")?)?,
        })
    }

    fn query_one(&self, where_clause: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, where_clause);
        let user = conn
            .query_row(&sql, args, Self::row_to_user)
            .optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (
                id, username, email, first_name, last_name, bio, role,
                is_staff, is_superuser, confirmation_code, confirmation_code_issued_at, date_joined
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.first_name,
                user.last_name,
                user.bio,
                user.role.to_string(),
                user.is_staff,
                user.is_superuser,
                user.confirmation_code,
                user.confirmation_code_issued_at.as_ref().map(encode_timestamp),
                encode_timestamp(&user.date_joined),
            ],
        )?;

        Ok(())
    }

    fn update(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE users SET
                username = ?2, email = ?3, first_name = ?4, last_name = ?5, bio = ?6,
                role = ?7, is_staff = ?8, is_superuser = ?9,
                confirmation_code = ?10, confirmation_code_issued_at = ?11
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.first_name,
                user.last_name,
                user.bio,
                user.role.to_string(),
                user.is_staff,
                user.is_superuser,
                user.confirmation_code,
                user.confirmation_code_issued_at.as_ref().map(encode_timestamp),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.query_one("id = ?1", &[&id.to_string()])
    }

    fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.query_one("username = ?1", &[&username])
    }

    fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.query_one("email = ?1 COLLATE NOCASE", &[&email])
    }

    fn get_by_username_and_email(&self, username: &str, email: &str) -> AppResult<Option<User>> {
        self.query_one("username = ?1 AND email = ?2 COLLATE NOCASE", &[&username, &email])
    }

    fn list_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use chrono::Utc;

    #[test]
    fn test_round_trip_keeps_code_and_flags() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        let mut user = User::new("alice".into(), "Alice@Example.com".into());
        user.role = Role::Moderator;
        user.is_staff = true;
        user.issue_confirmation_code("0123abcd".into(), Utc::now());
        repo.insert(&user).unwrap();

        let loaded = repo.get_by_id(user.id).unwrap().unwrap();
        assert_eq!(loaded.role, Role::Moderator);
        assert!(loaded.is_staff);
        assert!(!loaded.is_superuser);
        assert_eq!(loaded.confirmation_code.as_deref(), Some("0123abcd"));
        assert!(loaded.confirmation_code_issued_at.is_some());
    }

    #[test]
    fn test_email_lookup_ignores_case_username_does_not() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);
        repo.insert(&User::new("alice".into(), "Alice@Example.com".into())).unwrap();

        assert!(repo.get_by_email("alice@example.COM").unwrap().is_some());
        assert!(repo.get_by_username("Alice").unwrap().is_none());
        assert!(repo
            .get_by_username_and_email("alice", "ALICE@example.com")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_duplicate_username_is_unique_violation() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);
        repo.insert(&User::new("alice".into(), "a@example.com".into())).unwrap();

        let err = repo
            .insert(&User::new("alice".into(), "b@example.com".into()))
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_list_is_ordered_by_username() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);
        for name in ["carol", "alice", "bob"] {
            repo.insert(&User::new(name.into(), format!("{name}@example.com"))).unwrap();
        }

        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_delete_missing_user_is_not_found() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);
        assert!(matches!(repo.delete(Uuid::new_v4()), Err(AppError::NotFound(_))));
    }
}
