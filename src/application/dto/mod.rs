// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are the wire shapes of the request boundary
// - Ids are strings, timestamps are RFC 3339 strings
// - Users are referred to by username, never by id
// - Conversion FROM domain entities only; inbound DTOs map to service requests in the handlers

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Authored, Category, Comment, Genre, Review, TitleDetails, User};
use crate::repositories::TitleFilter;
use crate::services::{BearerToken, Registration};

/// Tells a missing field (`None`) apart from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// AUTH DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDto {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequestDto {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub token: String,
}

impl From<Registration> for SignupDto {
    fn from(registration: Registration) -> Self {
        Self {
            username: registration.username,
            email: registration.email,
        }
    }
}

impl From<BearerToken> for TokenDto {
    fn from(token: BearerToken) -> Self {
        Self { token: token.token }
    }
}

// ============================================================================
// USER DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            role: user.role.to_string(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// "user", "moderator" or "admin"
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// CATALOG DTOs
// ============================================================================

/// Used both for reads and for create requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreDto {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            name: genre.name,
            slug: genre.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDto {
    pub id: String,
    pub name: String,
    pub year: i32,
    /// Mean review score, `null` without reviews
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<GenreDto>,
    pub category: Option<CategoryDto>,
}

impl From<TitleDetails> for TitleDto {
    fn from(details: TitleDetails) -> Self {
        Self {
            id: details.title.id.to_string(),
            name: details.title.name,
            year: details.title.year,
            rating: details.rating,
            description: details.title.description,
            genre: details.genres.into_iter().map(GenreDto::from).collect(),
            category: details.category.map(CategoryDto::from),
        }
    }
}

/// Genres and category are given by slug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTitleDto {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTitleDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<Vec<String>>,
    /// `null` clears the category
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

/// Title list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleQueryDto {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<TitleQueryDto> for TitleFilter {
    fn from(query: TitleQueryDto) -> Self {
        Self {
            genre: query.genre,
            category: query.category,
            year: query.year,
            name: query.name,
        }
    }
}

// ============================================================================
// REVIEW & COMMENT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDto {
    pub id: String,
    pub text: String,
    /// Author's username
    pub author: String,
    pub score: i32,
    pub pub_date: String,
}

impl From<Authored<Review>> for ReviewDto {
    fn from(review: Authored<Review>) -> Self {
        Self {
            id: review.entity.id.to_string(),
            pub_date: format_timestamp(&review.entity.pub_date),
            text: review.entity.text,
            author: review.author_username,
            score: review.entity.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewDto {
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReviewDto {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: String,
    pub text: String,
    pub author: String,
    pub pub_date: String,
}

impl From<Authored<Comment>> for CommentDto {
    fn from(comment: Authored<Comment>) -> Self {
        Self {
            id: comment.entity.id.to_string(),
            pub_date: format_timestamp(&comment.entity.pub_date),
            text: comment.entity.text,
            author: comment.author_username,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentDto {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentDto {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_missing_are_distinct() {
        let missing: UpdateTitleDto = serde_json::from_str(r#"{ "name": "New" }"#).unwrap();
        assert_eq!(missing.category, None);

        let cleared: UpdateTitleDto = serde_json::from_str(r#"{ "category": null }"#).unwrap();
        assert_eq!(cleared.category, Some(None));

        let set: UpdateTitleDto = serde_json::from_str(r#"{ "category": "films" }"#).unwrap();
        assert_eq!(set.category, Some(Some("films".to_string())));
    }

    #[test]
    fn test_user_dto_hides_code() {
        let mut user = User::new("alice".into(), "alice@example.com".into());
        user.issue_confirmation_code("c0ffee00".into(), Utc::now());
        let json = serde_json::to_string(&UserDto::from(user)).unwrap();
        assert!(json.contains(r#""role":"user""#));
        assert!(!json.contains("c0ffee00"));
    }

    #[test]
    fn test_review_dto_names_author() {
        let review = Review::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), 8, "Fine".into());
        let dto = ReviewDto::from(Authored {
            entity: review,
            author_username: "alice".into(),
        });
        assert_eq!(dto.author, "alice");
        assert!(dto.pub_date.ends_with('Z'));
    }
}
