//! JSON snapshots of the whole store.

use crate::error::StoreError;
use crate::models::{Comment, Post, User};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every collection, serialized as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Snapshot {
    /// Reads a snapshot, returning `None` when the file does not exist.
    pub async fn read(path: &Path) -> Result<Option<Self>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Snapshot(format!("failed to read {}: {e}", path.display())))?;
        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Snapshot(format!("failed to parse {}: {e}", path.display())))?;
        Ok(Some(snapshot))
    }

    /// Writes the snapshot through a temporary sibling file and a rename.
    pub async fn write(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| StoreError::Snapshot(format!("failed to encode snapshot: {e}")))?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Snapshot(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::Snapshot(format!("failed to replace {}: {e}", path.display())))?;
        Ok(())
    }
}
