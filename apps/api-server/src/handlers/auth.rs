//! Authentication and account handlers.

use actix_web::{HttpResponse, web};

use fable_core::domain::User;
use fable_core::ports::{Job, JobQueue, PasswordService, TokenService, UserRepository};
use fable_shared::dto::{
    AuthResponse, LoginRequest, RegisterRequest, RenameAuthorRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Check if user already exists
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let password_hash = state
        .password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Create user; a blank pen name falls back to "Anonymous"
    let user = User::new(req.email.clone(), password_hash, req.author_name);
    let saved_user = state.users.save(user).await?;

    // Generate token
    let token = state
        .token_service
        .generate_token(saved_user.id, &saved_user.email, &saved_user.author_name)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Find user by email
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let valid = state
        .password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    // Generate token
    let token = state
        .token_service
        .generate_token(user.id, &user.email, &user.author_name)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        email: user.email,
        author_name: user.author_name,
    }))
}

/// PUT /api/auth/author-name
///
/// Changes the caller's pen name immediately on their account; the
/// denormalized copies on existing posts and comments are repaired by
/// a background fan-out job, so readers may briefly see the old name.
pub async fn rename_author(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<RenameAuthorRequest>,
) -> AppResult<HttpResponse> {
    let name = body.into_inner().author_name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Pen name cannot be empty".to_string()));
    }

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.author_name = name.clone();
    user.updated_at = chrono::Utc::now();
    let saved = state.users.save(user).await?;

    let job = Job::new(
        crate::background::AUTHOR_RENAME_JOB,
        serde_json::json!({ "author_id": saved.id, "name": name }),
    );
    if let Err(e) = state.jobs.enqueue(job).await {
        // The rename itself succeeded; the stale denormalized copies
        // will be repaired by the next rename.
        tracing::error!("Failed to enqueue rename fan-out: {}", e);
    }

    Ok(HttpResponse::Ok().json(UserResponse {
        id: saved.id,
        email: saved.email,
        author_name: saved.author_name,
    }))
}
