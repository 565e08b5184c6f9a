// src/domain/comment.rs
//
// Comment Entity
//
// Comments hang off a review and go away with it (or with their author).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::fields::require_text;
use crate::domain::DomainResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    /// Set once at creation
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(review_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            review_id,
            author_id,
            text,
            pub_date: crate::domain::timestamp_now(),
        }
    }
}

pub fn validate_comment(comment: &Comment) -> DomainResult<()> {
    require_text("text", &comment.text)
}
