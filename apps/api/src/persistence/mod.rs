// Persistence adapter: a local durable key-value store holding one serialized
// snapshot of the draft, written through a debounced saver.

pub mod debounce;
pub mod file_store;
#[cfg(test)]
pub mod memory;

use thiserror::Error;
use tracing::{info, warn};

use crate::draft::ResumeDraft;

pub use debounce::DebouncedSaver;
pub use file_store::FileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string key-value store. Implementations must be safe to call
/// from any thread; writes replace the whole entry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads the persisted draft, falling back when absent, unreadable or malformed.
/// Never fails.
pub fn load_draft(store: &dyn KeyValueStore, key: &str, fallback: ResumeDraft) -> ResumeDraft {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No saved draft under '{key}', starting from the empty template");
            return fallback;
        }
        Err(e) => {
            warn!("Could not read saved draft '{key}': {e}");
            return fallback;
        }
    };

    match serde_json::from_str::<ResumeDraft>(&raw) {
        Ok(draft) if draft.is_well_formed() => {
            info!("Restored saved draft '{key}'");
            draft
        }
        Ok(_) => {
            warn!("Saved draft '{key}' has an invalid shape, ignoring it");
            fallback
        }
        Err(e) => {
            warn!("Saved draft '{key}' is corrupt, ignoring it: {e}");
            fallback
        }
    }
}
