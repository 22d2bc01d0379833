//! Background work: the rename fan-out worker and scheduled jobs.

mod scheduler;

pub use scheduler::{Scheduler, SchedulerConfig};

use serde::Deserialize;
use uuid::Uuid;

use fable_core::ports::{CommentRepository, DailyQuota, Job, JobQueue, JobResult, PostRepository};

use crate::state::AppState;

/// Job type for the author-rename fan-out.
pub const AUTHOR_RENAME_JOB: &str = "author.rename";

#[derive(Debug, Deserialize)]
struct RenamePayload {
    author_id: Uuid,
    name: String,
}

/// Start the job queue worker and the cron scheduler.
pub async fn start(state: &AppState) {
    start_rename_worker(state).await;
    start_scheduler(state).await;
}

/// The rename fan-out: rewrite the denormalized author name on every
/// post and comment the author owns. Repo failures are retried by the
/// queue; a permanently failed job leaves stale names until the next
/// rename.
async fn start_rename_worker(state: &AppState) {
    let posts = state.posts.clone();
    let comments = state.comments.clone();

    let started = state
        .jobs
        .start_worker(move |job: Job| {
            let posts = posts.clone();
            let comments = comments.clone();
            Box::pin(async move {
                if job.job_type != AUTHOR_RENAME_JOB {
                    return JobResult::Failed(format!("Unknown job type: {}", job.job_type));
                }
                let payload: RenamePayload = match serde_json::from_value(job.payload.clone()) {
                    Ok(p) => p,
                    Err(e) => return JobResult::Failed(format!("Bad payload: {}", e)),
                };

                let posts_changed = match posts
                    .update_author_name(payload.author_id, &payload.name)
                    .await
                {
                    Ok(n) => n,
                    Err(e) => return JobResult::Retry(e.to_string()),
                };
                let comments_changed = match comments
                    .update_author_name(payload.author_id, &payload.name)
                    .await
                {
                    Ok(n) => n,
                    Err(e) => return JobResult::Retry(e.to_string()),
                };

                tracing::info!(
                    author_id = %payload.author_id,
                    posts_changed,
                    comments_changed,
                    "Author rename fan-out complete"
                );
                JobResult::Success
            })
        })
        .await;

    if let Err(e) = started {
        tracing::error!("Failed to start rename worker: {}", e);
    }
}

/// Nightly housekeeping: drop stale quota counters at local midnight.
/// The quota also resets lazily, so a missed run costs nothing.
async fn start_scheduler(state: &AppState) {
    let scheduler = match Scheduler::new(SchedulerConfig::from_env()).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create scheduler: {}", e);
            return;
        }
    };

    let quota = state.quota.clone();
    let registered = scheduler
        .add_cron("0 0 0 * * *", move || {
            let quota = quota.clone();
            async move {
                if let Err(e) = quota.sweep_expired().await {
                    tracing::error!("Quota sweep failed: {}", e);
                }
            }
        })
        .await;
    if let Err(e) = registered {
        tracing::error!("Failed to register quota sweep: {}", e);
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!("Failed to start scheduler: {}", e);
    }
}
