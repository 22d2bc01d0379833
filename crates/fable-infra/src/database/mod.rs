//! Document persistence over Postgres, with in-memory fallbacks for
//! tests and database-less development.

mod connections;
pub mod entity;
mod memory;
mod postgres;

pub use connections::{DatabaseConfig, connect};
pub use memory::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use postgres::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};

#[cfg(test)]
mod tests;
