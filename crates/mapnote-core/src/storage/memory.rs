//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::project::ProjectSnapshot;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    projects: RwLock<HashMap<String, ProjectSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, snapshot: &ProjectSnapshot) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let snapshot = snapshot.clone();
        Box::pin(async move {
            let mut projects = self.projects.write().map_err(Self::lock_error)?;
            projects.insert(id, snapshot);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectSnapshot>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            projects.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut projects = self.projects.write().map_err(Self::lock_error)?;
            projects.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            Ok(projects.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            Ok(projects.contains_key(&id))
        })
    }
}
