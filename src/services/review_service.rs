// src/services/review_service.rs
//
// Review Service - Scored reviews scoped under a title
//
// CRITICAL RULES:
// - The title must exist; a review id from another title is NotFound
// - One review per (author, title): pre-checked for a clean error,
//   enforced by the store's unique index when two requests race
// - Author, title and publication date never change after creation

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_review, Authored, DomainError, Review};
use crate::error::{AppError, AppResult};
use crate::permissions::{enforce, Action, Actor, Resource};
use crate::repositories::{ReviewRepository, TitleRepository};

#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    pub score: i32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReviewRequest {
    pub score: Option<i32>,
    pub text: Option<String>,
}

fn already_reviewed() -> AppError {
    DomainError::InvariantViolation("You have already reviewed this title".to_string()).into()
}

pub struct ReviewService {
    review_repo: Arc<dyn ReviewRepository>,
    title_repo: Arc<dyn TitleRepository>,
}

impl ReviewService {
    pub fn new(review_repo: Arc<dyn ReviewRepository>, title_repo: Arc<dyn TitleRepository>) -> Self {
        Self {
            review_repo,
            title_repo,
        }
    }

    pub fn create_review(
        &self,
        actor: &Actor,
        title_id: Uuid,
        request: CreateReviewRequest,
    ) -> AppResult<Authored<Review>> {
        enforce(actor, Action::Create, Resource::Review { author_id: None })?;
        let author = actor.require_user()?;
        self.ensure_title(title_id)?;

        let review = Review::new(title_id, author.id, request.score, request.text);
        validate_review(&review)?;

        if self.review_repo.exists_for_author(title_id, author.id)? {
            return Err(already_reviewed());
        }
        match self.review_repo.insert(&review) {
            Err(e) if e.is_unique_violation() => return Err(already_reviewed()),
            other => other?,
        }

        log::info!("{} reviewed title {} ({})", actor, title_id, review.score);
        Ok(Authored {
            entity: review,
            author_username: author.username.clone(),
        })
    }

    /// Oldest first
    pub fn list_reviews(&self, actor: &Actor, title_id: Uuid) -> AppResult<Vec<Authored<Review>>> {
        enforce(actor, Action::List, Resource::Review { author_id: None })?;
        self.ensure_title(title_id)?;
        self.review_repo.list_by_title(title_id)
    }

    pub fn get_review(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
    ) -> AppResult<Authored<Review>> {
        let review = self.load_scoped(title_id, review_id)?;
        enforce(
            actor,
            Action::Retrieve,
            Resource::Review { author_id: Some(review.entity.author_id) },
        )?;
        Ok(review)
    }

    pub fn update_review(
        &self,
        actor: &Actor,
        title_id: Uuid,
        review_id: Uuid,
        request: UpdateReviewRequest,
    ) -> AppResult<Authored<Review>> {
        actor.require_user()?;
        let mut review = self.load_scoped(title_id, review_id)?;
        enforce(
            actor,
            Action::Update,
            Resource::Review { author_id: Some(review.entity.author_id) },
        )?;

        review.entity.update(request.score, request.text);
        validate_review(&review.entity)?;
        self.review_repo.update(&review.entity)?;

        Ok(review)
    }

    pub fn delete_review(&self, actor: &Actor, title_id: Uuid, review_id: Uuid) -> AppResult<()> {
        actor.require_user()?;
        let review = self.load_scoped(title_id, review_id)?;
        enforce(
            actor,
            Action::Delete,
            Resource::Review { author_id: Some(review.entity.author_id) },
        )?;

        self.review_repo.delete(review_id)?;
        log::info!("{} deleted review {} by {}", actor, review_id, review.author_username);
        Ok(())
    }

    // ------------------------------------------------------------------------

    fn ensure_title(&self, title_id: Uuid) -> AppResult<()> {
        if !self.title_repo.exists(title_id)? {
            return Err(AppError::not_found("Title"));
        }
        Ok(())
    }

    fn load_scoped(&self, title_id: Uuid, review_id: Uuid) -> AppResult<Authored<Review>> {
        self.ensure_title(title_id)?;
        self.review_repo
            .get_by_id(review_id)?
            .filter(|r| r.entity.title_id == title_id)
            .ok_or_else(|| AppError::not_found("Review"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use crate::domain::{Role, Title, User};
    use crate::repositories::{
        SqliteReviewRepository, SqliteTitleRepository, SqliteUserRepository, UserRepository,
    };
    use std::sync::Barrier;
    use std::thread;

    struct Fixture {
        service: Arc<ReviewService>,
        titles: Arc<SqliteTitleRepository>,
        users: SqliteUserRepository,
        title: Title,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let (dir, pool) = test_pool();
        let titles = Arc::new(SqliteTitleRepository::new(pool.clone()));
        let title = Title::new("Andrei Rublev".into(), 1966, String::new());
        titles.insert(&title).unwrap();

        Fixture {
            service: Arc::new(ReviewService::new(
                Arc::new(SqliteReviewRepository::new(pool.clone())),
                titles.clone(),
            )),
            titles,
            users: SqliteUserRepository::new(pool),
            title,
            _dir: dir,
        }
    }

    fn member(fx: &Fixture, name: &str, role: Role) -> Actor {
        let mut user = User::new(name.into(), format!("{name}@example.com"));
        user.role = role;
        fx.users.insert(&user).unwrap();
        Actor::User(user)
    }

    fn review(score: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            score,
            text: "Thoughts".into(),
        }
    }

    #[test]
    fn test_rating_is_mean_of_scores() {
        let fx = fixture();
        let details = fx.titles.get_details(fx.title.id).unwrap().unwrap();
        assert_eq!(details.rating, None);

        let alice = member(&fx, "alice", Role::User);
        let bob = member(&fx, "bob", Role::User);
        fx.service.create_review(&alice, fx.title.id, review(8)).unwrap();
        fx.service.create_review(&bob, fx.title.id, review(10)).unwrap();

        let details = fx.titles.get_details(fx.title.id).unwrap().unwrap();
        assert_eq!(details.rating, Some(9.0));
    }

    #[test]
    fn test_created_review_matches_stored_pub_date() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);

        let created = fx.service.create_review(&alice, fx.title.id, review(6)).unwrap();
        let fetched = fx
            .service
            .get_review(&Actor::Anonymous, fx.title.id, created.entity.id)
            .unwrap();
        assert_eq!(fetched.entity.pub_date, created.entity.pub_date);
        assert_eq!(fetched.entity, created.entity);
    }

    #[test]
    fn test_second_review_is_validation_error() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);

        let first = fx.service.create_review(&alice, fx.title.id, review(7)).unwrap();
        assert_eq!(first.author_username, "alice");

        let err = fx.service.create_review(&alice, fx.title.id, review(3)).unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn test_concurrent_duplicates_yield_one_review() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = fx.service.clone();
                let actor = alice.clone();
                let barrier = barrier.clone();
                let title_id = fx.title.id;
                thread::spawn(move || {
                    barrier.wait();
                    service.create_review(&actor, title_id, review(i + 1))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, AppError::Domain(DomainError::InvariantViolation(_))), "{err}");
        }
        assert_eq!(fx.service.list_reviews(&Actor::Anonymous, fx.title.id).unwrap().len(), 1);
    }

    #[test]
    fn test_score_out_of_range() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        for score in [0, 11] {
            let err = fx.service.create_review(&alice, fx.title.id, review(score)).unwrap_err();
            assert!(matches!(err, AppError::Domain(ref e) if e.field_name() == Some("score")));
        }
    }

    #[test]
    fn test_missing_title_and_foreign_review_are_not_found() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let created = fx.service.create_review(&alice, fx.title.id, review(6)).unwrap();

        assert!(matches!(
            fx.service.create_review(&alice, Uuid::new_v4(), review(6)),
            Err(AppError::NotFound(_))
        ));

        let other = Title::new("Mirror".into(), 1975, String::new());
        fx.titles.insert(&other).unwrap();
        assert!(matches!(
            fx.service.get_review(&alice, other.id, created.entity.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_mutation_rights() {
        let fx = fixture();
        let alice = member(&fx, "alice", Role::User);
        let bob = member(&fx, "bob", Role::User);
        let moderator = member(&fx, "mod", Role::Moderator);
        let created = fx.service.create_review(&alice, fx.title.id, review(6)).unwrap();
        let id = created.entity.id;

        assert!(matches!(
            fx.service.create_review(&Actor::Anonymous, fx.title.id, review(6)),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            fx.service.update_review(&bob, fx.title.id, id, UpdateReviewRequest::default()),
            Err(AppError::Forbidden)
        ));

        let edited = fx
            .service
            .update_review(
                &alice,
                fx.title.id,
                id,
                UpdateReviewRequest {
                    score: Some(9),
                    text: None,
                },
            )
            .unwrap();
        assert_eq!(edited.entity.score, 9);
        assert_eq!(edited.entity.text, "Thoughts");
        assert_eq!(edited.entity.pub_date, created.entity.pub_date);

        fx.service.delete_review(&moderator, fx.title.id, id).unwrap();
        assert!(fx.service.list_reviews(&bob, fx.title.id).unwrap().is_empty());
    }
}
