use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::BlobStore;

/// Blob store kept in process memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single pre-seeded blob, e.g. a document written by an older client.
    pub fn with_blob(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.into(), value.into());
        Self {
            blobs: Mutex::new(blobs),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.lock().map_err(|_| anyhow!("blob store lock poisoned"))?;
        Ok(blobs.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().map_err(|_| anyhow!("blob store lock poisoned"))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().map_err(|_| anyhow!("blob store lock poisoned"))?;
        blobs.remove(key);
        Ok(())
    }
}
