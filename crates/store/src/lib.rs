//! Student profile storage backends for Padhai.
//!
//! Both backends implement `padhai_core::ProfileStore`. `open_from_config`
//! picks one from the `[store]` section.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use std::sync::Arc;

use padhai_config::StoreConfig;
use padhai_core::error::StoreError;
use padhai_core::store::ProfileStore;

/// Open the backend named by `config.backend`.
pub async fn open_from_config(config: &StoreConfig) -> Result<Arc<dyn ProfileStore>, StoreError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.resolved_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Storage(format!("Failed to create {}: {e}", parent.display()))
                })?;
            }
            let url = format!("sqlite://{}", path.display());
            Ok(Arc::new(SqliteStore::new(&url).await?))
        }
        other => Err(StoreError::Storage(format!(
            "Unsupported store backend: {other}"
        ))),
    }
}
