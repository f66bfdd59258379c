//! Periodic project persistence.

use crate::config::DEFAULT_AUTOSAVE_INTERVAL_SECS;
use crate::project::ProjectSnapshot;
use crate::storage::{FileStorage, Storage, StorageResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Key for the most recently saved project.
pub const LAST_PROJECT_KEY: &str = "__last_project__";

/// Clears the in-flight flag when a save finishes or is dropped.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Tracks unsaved changes and writes snapshots on an interval.
///
/// Overlapping saves are skipped: a save requested while another is still
/// running returns without touching storage. The interval is measured from
/// the last completed save.
pub struct AutoSaveManager {
    storage: Arc<dyn Storage>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    in_flight: Arc<AtomicBool>,
}

impl AutoSaveManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a save is currently running.
    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether an auto-save is due at `now`.
    pub fn should_save_at(&self, now: Instant) -> bool {
        if !self.dirty || self.is_saving() {
            return false;
        }
        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Save if dirty and the interval has elapsed. Returns true if a save happened.
    pub async fn maybe_save(&mut self, snapshot: &ProjectSnapshot) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(snapshot).await
    }

    /// Save immediately. Returns false if another save is still running.
    pub async fn save(&mut self, snapshot: &ProjectSnapshot) -> StorageResult<bool> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::warn!("Save of {} skipped: previous save still running", snapshot.project.id);
            return Ok(false);
        };
        self.storage.save(&snapshot.project.id, snapshot).await?;
        self.storage.save(LAST_PROJECT_KEY, snapshot).await?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(true)
    }

    pub async fn load(&mut self, id: &str) -> StorageResult<ProjectSnapshot> {
        let snapshot = self.storage.load(id).await?;
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(snapshot)
    }

    /// The most recently saved project, if any.
    pub async fn load_last(&mut self) -> Option<ProjectSnapshot> {
        match self.storage.load(LAST_PROJECT_KEY).await {
            Ok(snapshot) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(snapshot)
            }
            Err(_) => None,
        }
    }

    /// Saved project ids, without the last-project alias.
    pub async fn list_projects(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_PROJECT_KEY);
        Ok(ids)
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

/// File storage in the platform data directory.
pub fn create_default_storage() -> StorageResult<Arc<dyn Storage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}
