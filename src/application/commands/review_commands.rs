// src/application/commands/review_commands.rs
//
// Reviews under /titles/{title_id}, comments under
// /titles/{title_id}/reviews/{review_id}

use crate::application::commands::{parse_id, resolve_actor, CommandResult};
use crate::application::dto::*;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::services::{
    CreateCommentRequest, CreateReviewRequest, UpdateCommentRequest, UpdateReviewRequest,
};

// ============================================================================
// REVIEWS
// ============================================================================

pub fn list_reviews(state: &AppState, token: Option<&str>, title_id: &str) -> CommandResult<Vec<ReviewDto>> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let reviews = state
        .review_service
        .list_reviews(&actor, title_id)
        .to_error_response()?;
    Ok(reviews.into_iter().map(ReviewDto::from).collect())
}

pub fn get_review(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
) -> CommandResult<ReviewDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let review = state
        .review_service
        .get_review(&actor, title_id, review_id)
        .to_error_response()?;
    Ok(ReviewDto::from(review))
}

pub fn create_review(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    dto: CreateReviewDto,
) -> CommandResult<ReviewDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review = state
        .review_service
        .create_review(
            &actor,
            title_id,
            CreateReviewRequest {
                score: dto.score,
                text: dto.text,
            },
        )
        .to_error_response()?;
    Ok(ReviewDto::from(review))
}

pub fn update_review(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
    dto: UpdateReviewDto,
) -> CommandResult<ReviewDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let review = state
        .review_service
        .update_review(
            &actor,
            title_id,
            review_id,
            UpdateReviewRequest {
                score: dto.score,
                text: dto.text,
            },
        )
        .to_error_response()?;
    Ok(ReviewDto::from(review))
}

pub fn delete_review(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    state
        .review_service
        .delete_review(&actor, title_id, review_id)
        .to_error_response()
}

// ============================================================================
// COMMENTS
// ============================================================================

pub fn list_comments(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
) -> CommandResult<Vec<CommentDto>> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let comments = state
        .comment_service
        .list_comments(&actor, title_id, review_id)
        .to_error_response()?;
    Ok(comments.into_iter().map(CommentDto::from).collect())
}

pub fn get_comment(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
    comment_id: &str,
) -> CommandResult<CommentDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let comment_id = parse_id("Comment", comment_id)?;
    let comment = state
        .comment_service
        .get_comment(&actor, title_id, review_id, comment_id)
        .to_error_response()?;
    Ok(CommentDto::from(comment))
}

pub fn create_comment(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
    dto: CreateCommentDto,
) -> CommandResult<CommentDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let comment = state
        .comment_service
        .create_comment(&actor, title_id, review_id, CreateCommentRequest { text: dto.text })
        .to_error_response()?;
    Ok(CommentDto::from(comment))
}

pub fn update_comment(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
    comment_id: &str,
    dto: UpdateCommentDto,
) -> CommandResult<CommentDto> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let comment_id = parse_id("Comment", comment_id)?;
    let comment = state
        .comment_service
        .update_comment(
            &actor,
            title_id,
            review_id,
            comment_id,
            UpdateCommentRequest { text: dto.text },
        )
        .to_error_response()?;
    Ok(CommentDto::from(comment))
}

pub fn delete_comment(
    state: &AppState,
    token: Option<&str>,
    title_id: &str,
    review_id: &str,
    comment_id: &str,
) -> CommandResult<()> {
    let actor = resolve_actor(state, token)?;
    let title_id = parse_id("Title", title_id)?;
    let review_id = parse_id("Review", review_id)?;
    let comment_id = parse_id("Comment", comment_id)?;
    state
        .comment_service
        .delete_comment(&actor, title_id, review_id, comment_id)
        .to_error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::test_support::Harness;
    use crate::application::commands::create_title;
    use crate::domain::Role;

    #[test]
    fn test_review_and_comment_flow() {
        let harness = Harness::new();
        let state = &harness.state;
        let admin = harness.login_as("root", Role::Admin);
        let alice = harness.login_as("alice", Role::User);
        let bob = harness.login_as("bob", Role::User);

        let title = create_title(
            state,
            Some(&admin),
            CreateTitleDto {
                name: "The Sacrifice".into(),
                year: 1986,
                ..CreateTitleDto::default()
            },
        )
        .unwrap();

        let first = create_review(
            state,
            Some(&alice),
            &title.id,
            CreateReviewDto {
                text: "Haunting".into(),
                score: 8,
            },
        )
        .unwrap();
        create_review(
            state,
            Some(&bob),
            &title.id,
            CreateReviewDto {
                text: "Perfect".into(),
                score: 10,
            },
        )
        .unwrap();

        let again = create_review(
            state,
            Some(&alice),
            &title.id,
            CreateReviewDto {
                text: "Again".into(),
                score: 1,
            },
        )
        .unwrap_err();
        assert_eq!(again.status, 400);

        let rated = crate::application::commands::get_title(state, None, &title.id).unwrap();
        assert_eq!(rated.rating, Some(9.0));

        let authors: Vec<String> = list_reviews(state, None, &title.id)
            .unwrap()
            .into_iter()
            .map(|r| r.author)
            .collect();
        assert_eq!(authors, ["alice", "bob"]);

        let comment = create_comment(
            state,
            Some(&bob),
            &title.id,
            &first.id,
            CreateCommentDto {
                text: "Agreed".into(),
            },
        )
        .unwrap();
        assert_eq!(comment.author, "bob");

        let err = delete_comment(state, Some(&alice), &title.id, &first.id, &comment.id).unwrap_err();
        assert_eq!(err.status, 403);

        delete_review(state, Some(&alice), &title.id, &first.id).unwrap();
        let err = list_comments(state, None, &title.id, &first.id).unwrap_err();
        assert_eq!(err.status, 404);
    }
}
