use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author name shown when a profile cannot be resolved.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// User account plus author profile. The `author_name` here is the
/// source of truth that gets denormalized onto posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, password_hash: String, author_name: Option<String>) -> Self {
        let now = Utc::now();
        let author_name = author_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            author_name,
            created_at: now,
            updated_at: now,
        }
    }
}
