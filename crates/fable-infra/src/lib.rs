//! # Fable Infrastructure
//!
//! Concrete implementations of the ports defined in `fable-core`:
//! Postgres document repositories (with in-memory fallbacks), blob
//! stores, JWT + Argon2 authentication, the Gemini text-generation
//! client, the daily AI quota, rate limiting and the job queue.

pub mod ai;
pub mod auth;
pub mod blob;
pub mod database;
pub mod jobs;
pub mod quota;
pub mod rate_limit;

pub use ai::GeminiTextGenerator;
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use blob::{InMemoryBlobStore, LocalBlobStore};
pub use database::{
    DatabaseConfig, InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository, connect,
};
pub use jobs::InMemoryJobQueue;
pub use quota::InMemoryDailyQuota;
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
