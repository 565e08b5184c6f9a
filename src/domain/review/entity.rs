use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's scored review of a title
///
/// At most one review exists per (author, title) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,

    pub title_id: Uuid,

    pub author_id: Uuid,

    /// 1..=10
    pub score: i32,

    pub text: String,

    /// Set once at creation, never changes
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn new(title_id: Uuid, author_id: Uuid, score: i32, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title_id,
            author_id,
            score,
            text,
            pub_date: crate::domain::timestamp_now(),
        }
    }

    /// Edit the content; ownership and publication date are fixed
    pub fn update(&mut self, score: Option<i32>, text: Option<String>) {
        if let Some(s) = score {
            self.score = s;
        }
        if let Some(t) = text {
            self.text = t;
        }
    }
}
