//! Per-user daily usage quota for the AI-assist feature.

use async_trait::async_trait;
use uuid::Uuid;

/// Outcome of a quota consumption attempt.
#[derive(Debug, Clone)]
pub struct QuotaDecision {
    pub allowed: bool,
    /// Calls consumed today, including this one when allowed.
    pub used: u32,
    pub limit: u32,
}

/// Server-stored daily counter, checked before each AI-assist call.
/// Counters reset at the local-midnight boundary.
#[async_trait]
pub trait DailyQuota: Send + Sync {
    /// Consume one unit for `user_id` if the daily limit allows it.
    async fn consume(&self, user_id: Uuid) -> Result<QuotaDecision, QuotaError>;

    /// Drop counters from previous days. Invoked by the midnight sweep;
    /// implementations must also reset lazily so correctness never
    /// depends on the sweep having run.
    async fn sweep_expired(&self) -> Result<(), QuotaError>;
}

/// Quota backend errors.
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("Backend error: {0}")]
    Backend(String),
}
