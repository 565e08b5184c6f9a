// src/services/comment_service.rs
//
// Comment Service - Comments scoped under a review of a title

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_comment, Authored, Comment, Review};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::{CommentRepository, ReviewRepository, TitleRepository};

#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    title_repo: Arc<dyn TitleRepository>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        title_repo: Arc<dyn TitleRepository>,
    ) -> Self {
        Self {
            comment_repo,
            review_repo,
            title_repo,
        }
    }

    pub fn create_comment(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
        request: CreateCommentRequest,
    ) -> AppResult<Authored<Comment>> {
        enforce(actor, Action::Create, Resource::Comment { author_id: None })?;
        let author = actor.require_user()?;
        let review = self.load_review(title_id, review_id)?;

        let comment = Comment::new(review.id, author.id, request.text);
        validate_comment(&comment)?;
        self.comment_repo.insert(&comment)?;

        log::info!("{} commented on review {}", actor, review.id);
        Ok(Authored {
            entity: comment,
            author_username: author.username.clone(),
        })
    }

    /// Newest first
    pub fn list_comments(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
    ) -> AppResult<Vec<Authored<Comment>>> {
        enforce(actor, Action::List, Resource::Comment { author_id: None })?;
        let review = self.load_review(title_id, review_id)?;
        self.comment_repo.list_by_review(review.id)
    }

    pub fn get_comment(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> AppResult<Authored<Comment>> {
        let comment = self.load_scoped(title_id, review_id, comment_id)?;
        enforce(
            actor,
            Action::Retrieve,
            Resource::Comment { author_id: Some(comment.entity.author_id) },
        )?;
        Ok(comment)
    }

    pub fn update_comment(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
        request: UpdateCommentRequest,
    ) -> AppResult<Authored<Comment>> {
        actor.require_user()?;
        let mut comment = self.load_scoped(title_id, review_id, comment_id)?;
        enforce(
            actor,
            Action::Update,
            Resource::Comment { author_id: Some(comment.entity.author_id) },
        )?;

        if let Some(text) = request.text {
            comment.entity.text = text;
        }
        validate_comment(&comment.entity)?;
        self.comment_repo.update(&comment.entity)?;

        Ok(comment)
    }

    pub fn delete_comment(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> AppResult<()> {
        actor.require_user()?;
        let comment = self.load_scoped(title_id, review_id, comment_id)?;
        enforce(
            actor,
            Action::Delete,
            Resource::Comment { author_id: Some(comment.entity.author_id) },
        )?;

        self.comment_repo.delete(comment_id)?;
        log::info!("{} deleted comment {}", actor, comment_id);
        Ok(())
    }

    // ------------------------------------------------------------------------

    /// The review, provided it belongs to the title
    fn load_review(&self, title_id: Uuid, review_id: Uuid) -> AppResult<Review> {
        if !self.title_repo.exists(title_id)? {
            return Err(AppError::not_found("Title"));
        }
        self.review_repo
            .get_by_id(review_id)?
            .map(|r| r.entity)
            .filter(|r| r.title_id == title_id)
            .ok_or_else(|| AppError::not_found("Review"))
    }

    fn load_scoped(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> AppResult<Authored<Comment>> {
        let review = self.load_review(title_id, review_id)?;
        self.comment_repo
            .get_by_id(comment_id)?
            .filter(|c| c.entity.review_id == review.id)
            .ok_or_else(|| AppError::not_found("Comment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use crate::domain::{Role, Title, User};
    use crate::repositories::{
        SqliteCommentRepository, SqliteReviewRepository, SqliteTitleRepository,
        SqliteUserRepository, UserRepository,
    };

    struct Fixture {
        service: CommentService,
        reviews: Arc<SqliteReviewRepository>,
        users: SqliteUserRepository,
        title: Title,
        review: Review,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let (dir, pool) = test_pool();
        let titles = Arc::new(SqliteTitleRepository::new(pool.clone()));
        let reviews = Arc::new(SqliteReviewRepository::new(pool.clone()));
        let users = SqliteUserRepository::new(pool.clone());

        let title = Title::new("Nostalghia".into(), 1983, String::new());
        titles.insert(&title).unwrap();
        let critic = User::new("critic".into(), "critic@example.com".into());
        users.insert(&critic).unwrap();
        let review = Review::new(title.id, critic.id, 9, "Slow and beautiful".into());
        reviews.insert(&review).unwrap();

        Fixture {
            service: CommentService::new(
                Arc::new(SqliteCommentRepository::new(pool)),
                reviews.clone(),
                titles,
            ),
            reviews,
            users,
            title,
            review,
            _dir: dir,
        }
    }

    fn member(fx: &Fixture, name: &str, role: Role) -> Actor {
        let mut user = User::new(name.into(), format!("{name}@example.com"));
        user.role = role;
        fx.users.insert(&user).unwrap();
        Actor::User(user)
    }

    fn say(text: &str) -> CreateCommentRequest {
        CreateCommentRequest { text: text.into() }
    }

    #[test]
    fn test_created_comment_matches_stored_pub_date() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);

        let created = fx
            .service
            .create_comment(&alice, fx.title.id, fx.review.id, say("First"))
            .unwrap();
        let fetched = fx
            .service
            .get_comment(&Actor::Anonymous, fx.title.id, fx.review.id, created.entity.id)
            .unwrap();
        assert_eq!(fetched.entity, created.entity);
    }

    #[test]
    fn test_comment_lifecycle() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let bob = member(&fx, "bob", Role::User);
        let admin = member(&fx, "boss", Role::Admin);

        let comment = fx
            .service
            .create_comment(&alice, fx.title.id, fx.review.id, say("Agreed"))
            .unwrap();
        assert_eq!(comment.author_username, "alice");

        assert!(matches!(
            fx.service.update_comment(
                &bob,
                fx.title.id,
                fx.review.id,
                comment.entity.id,
                UpdateCommentRequest { text: Some("Hijacked".into()) }
            ),
            Err(AppError::Forbidden)
        ));

        let edited = fx
            .service
            .update_comment(
                &alice,
                fx.title.id,
                fx.review.id,
                comment.entity.id,
                UpdateCommentRequest { text: Some("Strongly agreed".into()) },
            )
            .unwrap();
        assert_eq!(edited.entity.text, "Strongly agreed");

        fx.service
            .delete_comment(&admin, fx.title.id, fx.review.id, comment.entity.id)
            .unwrap();
        assert!(fx
            .service
            .list_comments(&Actor::Anonymous, fx.title.id, fx.review.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let err = fx
            .service
            .create_comment(&alice, fx.title.id, fx.review.id, say("  "))
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(ref e) if e.field_name() == Some("text")));
    }

    #[test]
    fn test_anonymous_cannot_comment() {
        let fx = fixture();
        assert!(matches!(
            fx.service
                .create_comment(&Actor::Anonymous, fx.title.id, fx.review.id, say("hi")),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_review_must_belong_to_title() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        assert!(matches!(
            fx.service
                .create_comment(&alice, fx.title.id, Uuid::new_v4(), say("hi")),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            fx.service
                .list_comments(&alice, Uuid::new_v4(), fx.review.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_comments_vanish_with_review() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let comment = fx
            .service
            .create_comment(&alice, fx.title.id, fx.review.id, say("first"))
            .unwrap();

        fx.reviews.delete(fx.review.id).unwrap();
        assert!(matches!(
            fx.service
                .get_comment(&alice, fx.title.id, fx.review.id, comment.entity.id),
            Err(AppError::NotFound(_))
        ));
    }
}
