//! Storage abstraction for project persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, LAST_PROJECT_KEY, create_default_storage};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::project::ProjectSnapshot;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for project storage backends.
///
/// Object safe, so a session can hold any backend as `Arc<dyn Storage>`.
pub trait Storage: Send + Sync {
    /// Save a project snapshot under `id`.
    fn save(&self, id: &str, snapshot: &ProjectSnapshot) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a project snapshot.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectSnapshot>>;

    /// Delete a project.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored project IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a project exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
