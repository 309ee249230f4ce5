mod document;
mod memory;
mod repository;

pub use document::*;
pub use memory::*;
pub use repository::*;

use anyhow::Result;
use async_trait::async_trait;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Key-value persistence for serialized documents.
///
/// The application never talks to a database directly; it loads and saves whole
/// blobs through this trait so tests can swap in [`MemoryBlobStore`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
