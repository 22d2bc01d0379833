//! Comment handlers: listing, adding, and the two-tier delete.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fable_core::domain::Comment;
use fable_core::ports::{CommentRepository, PostRepository};
use fable_shared::dto::{AddCommentRequest, CommentView};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn view(comment: &Comment) -> CommentView {
    CommentView {
        id: comment.id,
        post_id: comment.post_id,
        author: fable_shared::dto::AuthorDto {
            id: comment.author.id,
            name: comment.author.name.clone(),
        },
        content: comment.content.clone(),
        created_at: comment.created_at,
        deleted: comment.deleted,
    }
}

/// GET /api/posts/{id}/comments - newest first.
pub async fn list(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let comments = state.comments.find_by_post(path.into_inner()).await?;
    let views: Vec<CommentView> = comments.iter().map(view).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/posts/{id}/comments
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let content = body.into_inner().content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
    }

    // Comments attach to existing posts only
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;
    if !post.published && post.author.id != identity.user_id {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    let author = super::posts::current_author(&state, &identity).await?;
    let comment = Comment::new(post_id, author, content);
    let saved = state.comments.save(comment).await?;
    Ok(HttpResponse::Created().json(view(&saved)))
}

/// DELETE /api/comments/{id}
///
/// Two-tier delete: the comment's author tombstones it (soft delete,
/// the record stays); the post's author removes it outright. Anyone
/// else gets 403.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?;

    if comment.author.id == identity.user_id {
        comment.soft_delete(identity.user_id)?;
        let saved = state.comments.save(comment).await?;
        return Ok(HttpResponse::Ok().json(view(&saved)));
    }

    let post = state
        .posts
        .find_by_id(comment.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", comment.post_id)))?;
    if post.author.id == identity.user_id {
        state.comments.delete(id).await?;
        return Ok(HttpResponse::NoContent().finish());
    }

    Err(AppError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure_routes;
    use crate::state::AppState;
    use actix_web::{App, test};
    use fable_core::domain::DELETED_COMMENT_TOMBSTONE;
    use fable_core::ports::{TokenService, UserRepository};
    use fable_shared::dto::PostSummary;

    async fn seeded_identity(state: &AppState, name: &str) -> (Uuid, String) {
        let user = fable_core::domain::User::new(
            format!("{}@example.com", name.to_lowercase()),
            "hash".to_string(),
            Some(name.to_string()),
        );
        let user = state.users.save(user).await.unwrap();
        let token = state
            .token_service
            .generate_token(user.id, &user.email, &user.author_name)
            .unwrap();
        (user.id, token)
    }

    fn seed_post_request(token: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({
                "title": "Commented",
                "published": true,
                "pages": [{ "title": "", "content": "text" }]
            }))
    }

    #[actix_web::test]
    async fn comment_author_soft_deletes_post_author_hard_deletes() {
        let state = AppState::for_tests();
        let token_service = state.token_service.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await;

        let (_, author_token) = seeded_identity(&state, "Author").await;
        let (_, reader_token) = seeded_identity(&state, "Reader").await;
        let seeded: PostSummary =
            test::call_and_read_body_json(&app, seed_post_request(&author_token).to_request())
                .await;
        let post_id = seeded.id;

        // Reader comments twice
        let comments_uri = format!("/api/posts/{}/comments", post_id);
        let mut ids = Vec::new();
        for text in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri(&comments_uri)
                .insert_header(("Authorization", format!("Bearer {}", reader_token)))
                .set_json(serde_json::json!({ "content": text }))
                .to_request();
            let created: CommentView = test::call_and_read_body_json(&app, req).await;
            ids.push(created.id);
        }

        // Reader deletes their own: tombstone stays
        let req = test::TestRequest::delete()
            .uri(&format!("/api/comments/{}", ids[0]))
            .insert_header(("Authorization", format!("Bearer {}", reader_token)))
            .to_request();
        let tombstoned: CommentView = test::call_and_read_body_json(&app, req).await;
        assert!(tombstoned.deleted);
        assert_eq!(tombstoned.content, DELETED_COMMENT_TOMBSTONE);

        // Post author deletes the other: gone entirely
        let req = test::TestRequest::delete()
            .uri(&format!("/api/comments/{}", ids[1]))
            .insert_header(("Authorization", format!("Bearer {}", author_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get().uri(&comments_uri).to_request();
        let listed: Vec<CommentView> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].deleted);
    }

    #[actix_web::test]
    async fn unrelated_user_cannot_delete_a_comment() {
        let state = AppState::for_tests();
        let token_service = state.token_service.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(token_service))
                .configure(configure_routes),
        )
        .await;

        let (_, author_token) = seeded_identity(&state, "Author").await;
        let (_, reader_token) = seeded_identity(&state, "Reader").await;
        let (_, other_token) = seeded_identity(&state, "Other").await;
        let seeded: PostSummary =
            test::call_and_read_body_json(&app, seed_post_request(&author_token).to_request())
                .await;
        let post_id = seeded.id;

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post_id))
            .insert_header(("Authorization", format!("Bearer {}", reader_token)))
            .set_json(serde_json::json!({ "content": "hello" }))
            .to_request();
        let created: CommentView = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/comments/{}", created.id))
            .insert_header(("Authorization", format!("Bearer {}", other_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }
}
