//! Blob storage adapters.

mod local;
mod memory;

pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;
