use super::entity::Review;
use crate::domain::fields::require_text;
use crate::domain::{DomainError, DomainResult};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Validates the fields of a single review.
///
/// The one-review-per-author-per-title rule spans records and is checked by
/// the review service against the store.
pub fn validate_review(review: &Review) -> DomainResult<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&review.score) {
        return Err(DomainError::field(
            "score",
            format!("Score must be between {} and {}", MIN_SCORE, MAX_SCORE),
        ));
    }
    require_text("text", &review.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn review(score: i32, text: &str) -> Review {
        Review::new(Uuid::new_v4(), Uuid::new_v4(), score, text.to_string())
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_review(&review(1, "ok")).is_ok());
        assert!(validate_review(&review(10, "ok")).is_ok());
        assert_eq!(validate_review(&review(0, "ok")).unwrap_err().field_name(), Some("score"));
        assert_eq!(validate_review(&review(11, "ok")).unwrap_err().field_name(), Some("score"));
    }

    #[test]
    fn test_blank_text_fails() {
        assert_eq!(validate_review(&review(5, " ")).unwrap_err().field_name(), Some("text"));
    }

    #[test]
    fn test_update_keeps_pub_date() {
        let mut r = review(5, "fine");
        let published = r.pub_date;
        r.update(Some(7), None);
        assert_eq!(r.score, 7);
        assert_eq!(r.text, "fine");
        assert_eq!(r.pub_date, published);
    }
}
