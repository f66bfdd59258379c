//! Undo/redo of recorded mutations, plus per-project version snapshots.
//!
//! The undo stack is event-sourced: the manager subscribes to mutation
//! events on the bus and records each one as an immutable before/after
//! action. Undo and redo only choose which side to write back.

use crate::bus::{EventBus, ListenerError, SubscriptionId};
use crate::config::{DEFAULT_MAX_UNDO_STEPS, DEFAULT_MAX_VERSIONS, EditorConfig};
use crate::element::Element;
use crate::events::{EditorEvent, EventKind, RemovedElement};
use crate::layer::{LayerId, LayerProps};
use crate::project::{ProjectMeta, ProjectSettings, ProjectSnapshot};
use crate::store::{ElementStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// One reversible change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryAction {
    Added { element: Element },
    Removed { removed: Vec<RemovedElement> },
    /// `index` is the position `before` held in its layer.
    Modified {
        before: Element,
        after: Element,
        #[serde(default)]
        index: usize,
    },
    LayerModified { id: LayerId, before: LayerProps, after: LayerProps },
    SettingsChanged { before: ProjectSettings, after: ProjectSettings },
}

/// Which side of an action to write back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

impl HistoryAction {
    /// The action recorded for a mutation event, if it is one.
    pub fn from_event(event: &EditorEvent) -> Option<Self> {
        match event {
            EditorEvent::ElementAdded { element } => Some(HistoryAction::Added {
                element: element.clone(),
            }),
            EditorEvent::ElementsRemoved { removed } => Some(HistoryAction::Removed {
                removed: removed.clone(),
            }),
            EditorEvent::ElementModified { before, after, index } => Some(HistoryAction::Modified {
                before: before.clone(),
                after: after.clone(),
                index: *index,
            }),
            EditorEvent::LayerModified { id, before, after } => Some(HistoryAction::LayerModified {
                id: id.clone(),
                before: before.clone(),
                after: after.clone(),
            }),
            EditorEvent::SettingsChanged { before, after } => Some(HistoryAction::SettingsChanged {
                before: before.clone(),
                after: after.clone(),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HistoryAction::Added { .. } => "added",
            HistoryAction::Removed { .. } => "removed",
            HistoryAction::Modified { .. } => "modified",
            HistoryAction::LayerModified { .. } => "layer-modified",
            HistoryAction::SettingsChanged { .. } => "settings-changed",
        }
    }

    /// Write one side of this action back into the session state.
    ///
    /// Lock checks are bypassed. Targets that no longer exist are skipped
    /// with a warning so the stacks stay consistent.
    pub fn apply(&self, direction: Direction, store: &mut ElementStore, project: &mut ProjectMeta) {
        let result = match (self, direction) {
            (HistoryAction::Added { element }, Direction::Undo) => {
                store.discard_element(element.id).map(|_| ()).ok_or(StoreError::ElementNotFound(element.id))
            }
            (HistoryAction::Added { element }, Direction::Redo) => store.push_element(element.clone()),
            (HistoryAction::Removed { removed }, Direction::Undo) => {
                let mut ordered: Vec<&RemovedElement> = removed.iter().collect();
                ordered.sort_by_key(|r| r.index);
                ordered
                    .into_iter()
                    .map(|r| store.restore_element(r.element.clone(), r.index))
                    .fold(Ok(()), Result::and)
            }
            (HistoryAction::Removed { removed }, Direction::Redo) => removed
                .iter()
                .map(|r| {
                    store
                        .discard_element(r.element.id)
                        .map(|_| ())
                        .ok_or(StoreError::ElementNotFound(r.element.id))
                })
                .fold(Ok(()), Result::and),
            (HistoryAction::Modified { before, index, .. }, Direction::Undo) => {
                store.replace_element_at(before.clone(), *index)
            }
            (HistoryAction::Modified { after, .. }, Direction::Redo) => store.replace_element(after.clone()),
            (HistoryAction::LayerModified { id, before, .. }, Direction::Undo) => {
                store.replace_layer_props(id, before.clone())
            }
            (HistoryAction::LayerModified { id, after, .. }, Direction::Redo) => {
                store.replace_layer_props(id, after.clone())
            }
            (HistoryAction::SettingsChanged { before, .. }, Direction::Undo) => {
                project.apply_settings(before.clone());
                Ok(())
            }
            (HistoryAction::SettingsChanged { after, .. }, Direction::Redo) => {
                project.apply_settings(after.clone());
                Ok(())
            }
        };
        if let Err(err) = result {
            log::warn!("{:?} of {} partially skipped: {}", direction, self.name(), err);
        }
    }
}

/// A recorded action and when it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(action: HistoryAction) -> Self {
        Self {
            action,
            timestamp: Utc::now(),
        }
    }
}

/// A full snapshot kept for coarse reverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub timestamp: DateTime<Utc>,
    pub snapshot: ProjectSnapshot,
}

/// Capped snapshot buffers keyed by project id.
#[derive(Debug, Clone)]
pub struct VersionHistory {
    max_versions: usize,
    by_project: HashMap<String, VecDeque<ProjectVersion>>,
}

impl VersionHistory {
    pub fn new(max_versions: usize) -> Self {
        Self {
            max_versions,
            by_project: HashMap::new(),
        }
    }

    /// Append a snapshot, evicting the oldest beyond capacity. Returns its index.
    pub fn push(&mut self, snapshot: ProjectSnapshot) -> usize {
        let versions = self.by_project.entry(snapshot.project.id.clone()).or_default();
        versions.push_back(ProjectVersion {
            timestamp: Utc::now(),
            snapshot,
        });
        while versions.len() > self.max_versions {
            versions.pop_front();
        }
        versions.len().saturating_sub(1)
    }

    /// Versions of one project, oldest first.
    pub fn list(&self, project_id: &str) -> Vec<ProjectVersion> {
        self.by_project
            .get(project_id)
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, project_id: &str, index: usize) -> Option<&ProjectVersion> {
        self.by_project.get(project_id)?.get(index)
    }

    pub fn len(&self, project_id: &str) -> usize {
        self.by_project.get(project_id).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, project_id: &str) -> bool {
        self.len(project_id) == 0
    }
}

/// Undo/redo stacks and version snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_undo_steps: usize,
    versions: VersionHistory,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_STEPS, DEFAULT_MAX_VERSIONS)
    }
}

impl HistoryManager {
    pub fn new(max_undo_steps: usize, max_versions: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_steps,
            versions: VersionHistory::new(max_versions),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.max_undo_steps, config.max_versions)
    }

    /// Subscribe `history` to every mutation event on `bus`.
    pub fn attach(history: &Rc<RefCell<Self>>, bus: &EventBus) -> Vec<SubscriptionId> {
        [
            EventKind::ElementAdded,
            EventKind::ElementModified,
            EventKind::ElementsRemoved,
            EventKind::LayerModified,
            EventKind::SettingsChanged,
        ]
        .into_iter()
        .map(|kind| {
            let history = Rc::clone(history);
            bus.on(kind, move |event| {
                let mut history = history
                    .try_borrow_mut()
                    .map_err(|_| ListenerError::new("history is busy"))?;
                history.record(event);
                Ok(())
            })
        })
        .collect()
    }

    /// Record a mutation event. Returns false for non-mutation events.
    pub fn record(&mut self, event: &EditorEvent) -> bool {
        match HistoryAction::from_event(event) {
            Some(action) => {
                self.push(action);
                true
            }
            None => false,
        }
    }

    /// Push a new action, evicting the oldest beyond capacity and clearing redo.
    pub fn push(&mut self, action: HistoryAction) {
        log::debug!("History push: {}", action.name());
        self.undo_stack.push(HistoryEntry::new(action));
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_undo_steps {
            let excess = self.undo_stack.len() - self.max_undo_steps;
            self.undo_stack.drain(..excess);
        }
    }

    /// Revert the newest action. Returns the entry, or `None` if there is nothing to undo.
    pub fn undo(&mut self, store: &mut ElementStore, project: &mut ProjectMeta) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        entry.action.apply(Direction::Undo, store, project);
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Re-apply the newest undone action.
    pub fn redo(&mut self, store: &mut ElementStore, project: &mut ProjectMeta) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        entry.action.apply(Direction::Redo, store, project);
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }

    /// Redo entries, next-to-redo last.
    pub fn redo_entries(&self) -> &[HistoryEntry] {
        &self.redo_stack
    }

    pub fn max_undo_steps(&self) -> usize {
        self.max_undo_steps
    }

    /// Drop both stacks (after a wholesale reload).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn versions(&self) -> &VersionHistory {
        &self.versions
    }

    /// Keep a full snapshot. Returns its index in the project's version list.
    pub fn add_version(&mut self, snapshot: ProjectSnapshot) -> usize {
        self.versions.push(snapshot)
    }
}
