use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use uuid::Uuid;

use fable_core::ports::{DailyQuota, QuotaDecision, QuotaError};

/// Default daily AI-assist allowance per user.
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// In-memory daily quota. Counters are keyed by user and stamped with
/// the local date they belong to; a counter from a previous day resets
/// lazily on the next consume, so the midnight sweep is housekeeping
/// rather than a correctness requirement.
pub struct InMemoryDailyQuota {
    limit: u32,
    counters: RwLock<HashMap<Uuid, (NaiveDate, u32)>>,
}

impl InMemoryDailyQuota {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            counters: RwLock::new(HashMap::new()),
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

impl Default for InMemoryDailyQuota {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}

#[async_trait]
impl DailyQuota for InMemoryDailyQuota {
    async fn consume(&self, user_id: Uuid) -> Result<QuotaDecision, QuotaError> {
        let today = Self::today();
        let mut counters = self.counters.write().await;

        let entry = counters.entry(user_id).or_insert((today, 0));
        if entry.0 != today {
            *entry = (today, 0);
        }

        if entry.1 >= self.limit {
            return Ok(QuotaDecision {
                allowed: false,
                used: entry.1,
                limit: self.limit,
            });
        }

        entry.1 += 1;
        Ok(QuotaDecision {
            allowed: true,
            used: entry.1,
            limit: self.limit,
        })
    }

    async fn sweep_expired(&self) -> Result<(), QuotaError> {
        let today = Self::today();
        let mut counters = self.counters.write().await;
        let before = counters.len();
        counters.retain(|_, (date, _)| *date == today);
        let dropped = before - counters.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Swept stale quota counters");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consume_counts_up_to_the_limit() {
        let quota = InMemoryDailyQuota::new(2);
        let user = Uuid::new_v4();

        let first = quota.consume(user).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.used, 1);

        let second = quota.consume(user).await.unwrap();
        assert!(second.allowed);
        assert_eq!(second.used, 2);

        let third = quota.consume(user).await.unwrap();
        assert!(!third.allowed);
        assert_eq!(third.used, 2);
        assert_eq!(third.limit, 2);
    }

    #[tokio::test]
    async fn counters_are_per_user() {
        let quota = InMemoryDailyQuota::new(1);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(quota.consume(a).await.unwrap().allowed);
        assert!(!quota.consume(a).await.unwrap().allowed);
        assert!(quota.consume(b).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn stale_counters_reset_on_next_consume() {
        let quota = InMemoryDailyQuota::new(1);
        let user = Uuid::new_v4();

        let yesterday = InMemoryDailyQuota::today().pred_opt().unwrap();
        quota
            .counters
            .write()
            .await
            .insert(user, (yesterday, 1));

        let decision = quota.consume(user).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.used, 1);
    }

    #[tokio::test]
    async fn sweep_drops_only_previous_days() {
        let quota = InMemoryDailyQuota::new(5);
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        let yesterday = InMemoryDailyQuota::today().pred_opt().unwrap();
        quota.counters.write().await.insert(stale, (yesterday, 3));
        quota.consume(fresh).await.unwrap();

        quota.sweep_expired().await.unwrap();

        let counters = quota.counters.read().await;
        assert!(!counters.contains_key(&stale));
        assert!(counters.contains_key(&fresh));
    }
}
