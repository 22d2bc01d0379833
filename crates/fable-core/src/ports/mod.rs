//! Ports - trait definitions for external collaborators.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod job_queue;
mod quota;
mod rate_limit;
mod repository;
mod text_generation;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use blob_store::{BlobStore, BlobStoreError, cover_path, novel_image_path};
pub use job_queue::{Job, JobQueue, JobQueueError, JobResult, QueueStats};
pub use quota::{DailyQuota, QuotaDecision, QuotaError};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{CommentRepository, PostRepository, UserRepository};
pub use text_generation::{TextGenError, TextGenerator};
