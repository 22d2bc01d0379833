//! Post handlers: listing, reading, editing and social toggles.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use fable_core::domain::{AuthorRef, ImageRef, PageDraft, Post, PostDraft};
use fable_core::pagination::{PageControl, page_controls};
use fable_core::ports::{BlobStore, PostRepository, UserRepository};
use fable_shared::dto::{
    AuthorDto, ImageRefDto, PageControlDto, PageInput, PageView, PostEditView, PostSummary,
    PostView, SavePostRequest, ToggleResponse,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn author_dto(author: &AuthorRef) -> AuthorDto {
    AuthorDto {
        id: author.id,
        name: author.name.clone(),
    }
}

fn image_dto(image: &ImageRef) -> ImageRefDto {
    ImageRefDto {
        id: image.id.clone(),
        url: image.url.clone(),
    }
}

fn image_ref(dto: ImageRefDto) -> ImageRef {
    ImageRef {
        id: dto.id,
        url: dto.url,
    }
}

fn summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        synopsis: post.synopsis.clone(),
        tags: post.tags.clone(),
        author: author_dto(&post.author),
        published: post.published,
        cover_image: post.cover_image.as_ref().map(image_dto),
        page_count: post.pages.len(),
        likes: post.likes.len(),
        favorites: post.favorites.len(),
        views: post.views,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Turn a save request into an editor draft. Page timestamps restart
/// at save time; the document's own timestamps are what readers see.
fn draft_from_request(req: SavePostRequest) -> PostDraft {
    let now = chrono::Utc::now();
    let mut draft = PostDraft::new();
    draft.title = req.title;
    draft.synopsis = req.synopsis;
    draft.tags = req.tags;
    draft.published = req.published;
    draft.cover_image = req.cover_image.map(image_ref);
    draft.images = req.images.into_iter().map(image_ref).collect();
    if !req.pages.is_empty() {
        draft.pages = req
            .pages
            .into_iter()
            .map(|p: PageInput| PageDraft {
                title: p.title,
                content: p.content,
                created_at: now,
                updated_at: now,
            })
            .collect();
        draft.current = 0;
    }
    draft
}

/// The pen name is denormalized onto posts and comments at write time,
/// so it comes from the profile, not from the token: the claim is a
/// login-time snapshot and goes stale across a rename.
pub(super) async fn current_author(state: &AppState, identity: &Identity) -> AppResult<AuthorRef> {
    let name = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .map(|user| user.author_name)
        .unwrap_or_else(|| identity.author_name.clone());
    Ok(AuthorRef {
        id: identity.user_id,
        name,
    })
}

async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
}

/// GET /api/posts - published posts, newest first.
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_published().await?;
    let summaries: Vec<PostSummary> = posts.iter().map(summary).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /api/posts/mine - the caller's posts, drafts included.
pub async fn list_mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_author(identity.user_id).await?;
    let summaries: Vec<PostSummary> = posts.iter().map(summary).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// POST /api/posts - create from a draft (publish or draft-save).
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let draft = draft_from_request(body.into_inner());
    let author = current_author(&state, &identity).await?;
    let post = state.builder.build_for_create(&draft, author)?;
    let saved = state.posts.save(post).await?;
    Ok(HttpResponse::Created().json(summary(&saved)))
}

#[derive(Debug, Deserialize)]
pub struct ReadQuery {
    #[serde(default)]
    pub page: usize,
}

/// GET /api/posts/{id}?page=N - one rendered page plus the pagination
/// strip. Increments the view counter best-effort. Unpublished posts
/// are visible to their author only and hidden (404) from everyone
/// else.
pub async fn read(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<ReadQuery>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = find_post(&state, id).await?;

    let viewer = identity.0.as_ref().map(|i| i.user_id);
    if !post.published && viewer != Some(post.author.id) {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }

    let current = query.page;
    if current >= post.pages.len() {
        return Err(AppError::BadRequest(format!(
            "Page {} out of range (post has {} pages)",
            current,
            post.pages.len()
        )));
    }

    // Best-effort; a lost increment is acceptable.
    if post.published {
        if let Err(e) = state.posts.increment_views(id).await {
            tracing::warn!("View increment failed for {}: {}", id, e);
        }
    }

    let page = &post.pages[current];
    let controls = page_controls(post.pages.len(), current)
        .into_iter()
        .map(|c| match c {
            PageControl::Number(page) => PageControlDto::Number { page },
            PageControl::Ellipsis => PageControlDto::Ellipsis,
        })
        .collect();

    let view = PostView {
        id: post.id,
        title: post.title.clone(),
        synopsis: post.synopsis.clone(),
        tags: post.tags.clone(),
        author: author_dto(&post.author),
        published: post.published,
        cover_image: post.cover_image.as_ref().map(image_dto),
        images: post.images.iter().map(image_dto).collect(),
        page_count: post.pages.len(),
        current_page: current,
        page: PageView {
            title: page.title.clone(),
            html: state.codec.render(&page.content, &post.images),
            created_at: page.created_at,
            updated_at: page.updated_at,
        },
        controls,
        likes: post.likes.len(),
        favorites: post.favorites.len(),
        liked_by_me: viewer.map(|v| post.likes.contains(&v)).unwrap_or(false),
        favorited_by_me: viewer.map(|v| post.favorites.contains(&v)).unwrap_or(false),
        views: post.views,
        created_at: post.created_at,
        updated_at: post.updated_at,
    };

    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/posts/{id}/edit - the post back in editor representation,
/// owner only.
pub async fn edit_view(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    post.ensure_author(identity.user_id)?;

    let view = PostEditView {
        id: post.id,
        title: post.title.clone(),
        synopsis: post.synopsis.clone(),
        tags: post.tags.clone(),
        published: post.published,
        cover_image: post.cover_image.as_ref().map(image_dto),
        images: post.images.iter().map(image_dto).collect(),
        pages: post
            .pages
            .iter()
            .map(|p| PageInput {
                title: p.title.clone(),
                content: state.codec.to_editor(&p.content),
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(view))
}

/// PUT /api/posts/{id} - owner-gated update. Social counters and the
/// creation time survive the edit.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let existing = find_post(&state, path.into_inner()).await?;
    existing.ensure_author(identity.user_id)?;

    let draft = draft_from_request(body.into_inner());
    let updated = state.builder.build_for_update(&existing, &draft)?;
    let saved = state.posts.save(updated).await?;
    Ok(HttpResponse::Ok().json(summary(&saved)))
}

/// DELETE /api/posts/{id} - owner-gated. Cover and inline blobs are
/// deleted best-effort before the document goes.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = find_post(&state, id).await?;
    post.ensure_author(identity.user_id)?;

    let mut blob_paths: Vec<&str> = post.images.iter().map(|i| i.id.as_str()).collect();
    if let Some(cover) = &post.cover_image {
        blob_paths.push(cover.id.as_str());
    }
    for path in blob_paths {
        if let Err(e) = state.blobs.delete(path).await {
            tracing::warn!("Blob cleanup failed for {}: {}", path, e);
        }
    }

    state.posts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Drafts are invisible to everyone but their author; interacting with
/// one must not reveal that it exists.
fn ensure_visible(post: &Post, viewer: Uuid) -> AppResult<()> {
    if !post.published && post.author.id != viewer {
        return Err(AppError::NotFound(format!("Post {} not found", post.id)));
    }
    Ok(())
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = find_post(&state, path.into_inner()).await?;
    ensure_visible(&post, identity.user_id)?;
    let active = post.toggle_like(identity.user_id);
    let count = post.likes.len();
    state.posts.save(post).await?;
    Ok(HttpResponse::Ok().json(ToggleResponse { active, count }))
}

/// POST /api/posts/{id}/favorite
pub async fn toggle_favorite(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = find_post(&state, path.into_inner()).await?;
    ensure_visible(&post, identity.user_id)?;
    let active = post.toggle_favorite(identity.user_id);
    let count = post.favorites.len();
    state.posts.save(post).await?;
    Ok(HttpResponse::Ok().json(ToggleResponse { active, count }))
}
