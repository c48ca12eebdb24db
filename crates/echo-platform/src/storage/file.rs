//! File-backed storage backend.
//!
//! One file per key inside a data directory. Keys are sanitized to a
//! filesystem-safe alphabet before use.

use std::path::PathBuf;

use async_trait::async_trait;

use echo_core::ports::StoragePort;
use echo_types::{ChatError, Result};

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let root = dir.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| ChatError::Storage(format!("Cannot create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

/// Map a storage key to a safe file name. Anything outside
/// `[A-Za-z0-9._-]` becomes an underscore.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChatError::Storage(format!("Read {}: {}", key, e))),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|e| ChatError::Storage(format!("Write {}: {}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChatError::Storage(format!("Delete {}: {}", key, e))),
        }
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}
