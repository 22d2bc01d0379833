//! Daily quota adapters.

mod memory;

pub use memory::InMemoryDailyQuota;
