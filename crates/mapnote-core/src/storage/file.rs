//! File-based storage: one JSON file per project.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::project::ProjectSnapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores project snapshots as JSON files in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {}", e)))?;
        }
        Ok(Self { base_path })
    }

    /// File storage in the platform data directory.
    ///
    /// On Unix: `~/.local/share/mapnote/projects/`
    /// On Windows: `%LOCALAPPDATA%\mapnote\projects\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("mapnote").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, snapshot: &ProjectSnapshot) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        let json = snapshot.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectSnapshot>> {
        let path = self.project_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
            ProjectSnapshot::from_json(&json)
                .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| StorageError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries =
                fs::read_dir(&base).map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;
            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
