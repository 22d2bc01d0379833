//! Image upload and removal, gated by the image guard.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use fable_core::domain::{ImageRef, MAX_INLINE_IMAGES};
use fable_core::ports::{BlobStore, PostRepository, cover_path, novel_image_path};
use fable_shared::dto::ImageRefDto;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub cover: bool,
}

/// POST /api/posts/{id}/images[?cover=true]
///
/// Raw image bytes in the body. The guard validates type and downscales
/// to the size caps before anything reaches the blob store; a rejected
/// upload stores nothing.
pub async fn upload(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;
    post.ensure_author(identity.user_id)?;

    if !query.cover && post.images.len() >= MAX_INLINE_IMAGES {
        return Err(AppError::BadRequest(format!(
            "A post may carry at most {} inline images",
            MAX_INLINE_IMAGES
        )));
    }

    let processed = state.image_guard.process(&body)?;

    let storage_path = if query.cover {
        cover_path(post_id)
    } else {
        novel_image_path(post_id)
    };
    let url = state
        .blobs
        .put(&storage_path, processed.bytes, processed.content_type)
        .await?;

    let image = ImageRef {
        id: storage_path,
        url,
    };

    if query.cover {
        // Replacing a cover drops the old blob best-effort.
        if let Some(old) = post.cover_image.replace(image.clone()) {
            if let Err(e) = state.blobs.delete(&old.id).await {
                tracing::warn!("Old cover cleanup failed for {}: {}", old.id, e);
            }
        }
    } else {
        post.add_image(image.clone())?;
    }

    state.posts.save(post).await?;

    Ok(HttpResponse::Created().json(ImageRefDto {
        id: image.id,
        url: image.url,
    }))
}

/// DELETE /api/posts/{id}/images/{image_id}
///
/// Removes the blob and the post's reference to it, and strips any
/// placeholder for it from every page so no dangling tag survives.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, image_id) = path.into_inner();
    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;
    post.ensure_author(identity.user_id)?;

    let removed = if post.cover_image.as_ref().is_some_and(|c| c.id == image_id) {
        post.cover_image.take()
    } else {
        post.remove_image(&image_id)
    };
    let removed =
        removed.ok_or_else(|| AppError::NotFound(format!("Image {} not found", image_id)))?;

    if let Err(e) = state.blobs.delete(&removed.id).await {
        tracing::warn!("Blob delete failed for {}: {}", removed.id, e);
    }

    for page in &mut post.pages {
        page.content = state.codec.strip_image(&page.content, &image_id);
    }

    state.posts.save(post).await?;
    Ok(HttpResponse::NoContent().finish())
}
