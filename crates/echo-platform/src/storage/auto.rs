//! Pick a storage backend from configuration.
//!
//! Priority for `Auto`: file-backed → memory (fallback).

use std::sync::Arc;

use echo_core::ports::StoragePort;
use echo_types::config::{StorageBackendType, StorageConfig};
use echo_types::Result;

use super::{FileStorage, MemoryStorage};

const DEFAULT_DATA_DIR: &str = ".echo-chat";

/// Open the configured storage backend.
/// Returns a trait object so callers are backend-agnostic. Never fails:
/// an unusable file backend degrades to memory with a warning.
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn StoragePort>> {
    match config.backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackendType::File | StorageBackendType::Auto => {
            let dir = config
                .data_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
            match FileStorage::open(&dir).await {
                Ok(file) => {
                    log::info!("Storage backend: file ({})", dir);
                    Ok(Arc::new(file))
                }
                Err(e) => {
                    log::warn!("File storage unavailable ({}), falling back to memory", e);
                    Ok(Arc::new(MemoryStorage::new()))
                }
            }
        }
    }
}
