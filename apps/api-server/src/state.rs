//! Application state - shared across all handlers.

use std::sync::Arc;

use fable_core::content::ContentCodec;
use fable_core::domain::PostBuilder;
use fable_core::image_guard::{ImageGuard, ImagePolicy};
use fable_core::ports::{
    BlobStore, CommentRepository, DailyQuota, PasswordService, PostRepository, RateLimiter,
    TextGenerator, TokenService, UserRepository,
};
use fable_infra::{
    Argon2PasswordService, GeminiTextGenerator, InMemoryBlobStore, InMemoryCommentRepository,
    InMemoryDailyQuota, InMemoryJobQueue, InMemoryPostRepository, InMemoryRateLimiter,
    InMemoryUserRepository, JwtTokenService, LocalBlobStore, PostgresCommentRepository,
    PostgresPostRepository, PostgresUserRepository, connect,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub blobs: Arc<dyn BlobStore>,
    pub quota: Arc<dyn DailyQuota>,
    /// Absent when no API key is configured; the assist endpoint then
    /// reports the feature as unavailable.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub token_service: Arc<dyn TokenService>,
    pub password_service: Arc<dyn PasswordService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Concrete type: the job queue trait's worker entry point is
    /// generic and cannot live behind `dyn`.
    pub jobs: Arc<InMemoryJobQueue>,
    pub builder: Arc<PostBuilder>,
    pub codec: Arc<ContentCodec>,
    pub image_guard: Arc<ImageGuard>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, comments, users): (
            Arc<dyn PostRepository>,
            Arc<dyn CommentRepository>,
            Arc<dyn UserRepository>,
        ) = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => (
                    Arc::new(PostgresPostRepository::new(conn.clone())),
                    Arc::new(PostgresCommentRepository::new(conn.clone())),
                    Arc::new(PostgresUserRepository::new(conn)),
                ),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_repos()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_repos()
            }
        };

        let blobs: Arc<dyn BlobStore> = if config.database.is_some() {
            Arc::new(LocalBlobStore::new(
                config.blob_root.clone(),
                config.blob_public_base.clone(),
            ))
        } else {
            Arc::new(InMemoryBlobStore::new())
        };

        let generator: Option<Arc<dyn TextGenerator>> = match GeminiTextGenerator::from_env() {
            Some(g) => Some(Arc::new(g)),
            None => {
                tracing::warn!("GEMINI_API_KEY not set. AI-assist endpoint disabled.");
                None
            }
        };

        tracing::info!("Application state initialized");

        Self {
            posts,
            comments,
            users,
            blobs,
            quota: Arc::new(InMemoryDailyQuota::new(config.assist_daily_limit)),
            generator,
            token_service: Arc::new(JwtTokenService::from_env()),
            password_service: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::from_env()),
            jobs: Arc::new(InMemoryJobQueue::from_env()),
            builder: Arc::new(PostBuilder::default()),
            codec: Arc::new(ContentCodec::new()),
            image_guard: Arc::new(ImageGuard::new(ImagePolicy::default())),
        }
    }

    /// Fully in-memory state for handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let (posts, comments, users) = in_memory_repos();
        Self {
            posts,
            comments,
            users,
            blobs: Arc::new(InMemoryBlobStore::new()),
            quota: Arc::new(InMemoryDailyQuota::new(5)),
            generator: None,
            token_service: Arc::new(JwtTokenService::new(fable_infra::JwtConfig {
                secret: "handler-test-secret".to_string(),
                expiration_hours: 1,
                issuer: "fable-test".to_string(),
            })),
            password_service: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(Default::default())),
            jobs: Arc::new(InMemoryJobQueue::new(Default::default())),
            builder: Arc::new(PostBuilder::default()),
            codec: Arc::new(ContentCodec::new()),
            image_guard: Arc::new(ImageGuard::new(ImagePolicy::default())),
        }
    }
}

fn in_memory_repos() -> (
    Arc<dyn PostRepository>,
    Arc<dyn CommentRepository>,
    Arc<dyn UserRepository>,
) {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryCommentRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}
