//! Event vocabulary shared by every component of an editing session.
//!
//! Each event kind has exactly one payload shape, so a producer and its
//! consumers cannot disagree about what an event carries.

use crate::element::{Element, ElementId};
use crate::history::HistoryEntry;
use crate::layer::{Layer, LayerId, LayerProps};
use crate::project::{ProjectMeta, ProjectSettings};
use crate::tools::ToolKind;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An element taken out of a layer, with its former z-order position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedElement {
    pub element: Element,
    pub index: usize,
}

/// Events published on the [`EventBus`](crate::bus::EventBus).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A gesture preview element came into existence.
    TempCreated { element: Element },
    /// A gesture preview changed geometry.
    TempUpdated { element: Element },
    /// A gesture preview went away (committed or discarded).
    TempRemoved { id: ElementId },
    /// An element was committed into its layer.
    ElementAdded { element: Element },
    /// An element changed. `index` is where `before` sat in its layer.
    ElementModified { before: Element, after: Element, index: usize },
    ElementSelected { id: ElementId },
    ElementDeselected { id: ElementId },
    /// One batch of elements left the store.
    ElementsRemoved { removed: Vec<RemovedElement> },
    SelectionBoxStarted { origin: Point },
    SelectionBoxUpdated { rect: Rect },
    SelectionBoxEnded { rect: Rect, selected: Vec<ElementId> },
    LayerAdded { layer: Layer },
    LayerRemoved { layer: Layer },
    LayerActivated { id: LayerId },
    LayerModified { id: LayerId, before: LayerProps, after: LayerProps },
    LayersReordered { order: Vec<LayerId> },
    ProjectCreated { project: ProjectMeta },
    ProjectLoaded { project: ProjectMeta },
    ProjectSaved { project_id: String, version: usize },
    ProjectAutosaved { project_id: String, version: usize },
    ProjectUndo { entry: HistoryEntry },
    ProjectRedo { entry: HistoryEntry },
    ProjectReverted { project_id: String, index: usize },
    SettingsChanged { before: ProjectSettings, after: ProjectSettings },
    SaveFailed { project_id: String, message: String },
    LoadFailed { project_id: String, message: String },
    ToolChanged { old: ToolKind, new: ToolKind },
    /// A listener failed while handling `source`.
    Error { source: EventKind, message: String },
}

/// Discriminant of [`EditorEvent`], used to subscribe to one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TempCreated,
    TempUpdated,
    TempRemoved,
    ElementAdded,
    ElementModified,
    ElementSelected,
    ElementDeselected,
    ElementsRemoved,
    SelectionBoxStarted,
    SelectionBoxUpdated,
    SelectionBoxEnded,
    LayerAdded,
    LayerRemoved,
    LayerActivated,
    LayerModified,
    LayersReordered,
    ProjectCreated,
    ProjectLoaded,
    ProjectSaved,
    ProjectAutosaved,
    ProjectUndo,
    ProjectRedo,
    ProjectReverted,
    SettingsChanged,
    SaveFailed,
    LoadFailed,
    ToolChanged,
    Error,
}

impl EventKind {
    /// Wire name of the event, e.g. `"element:add-to-layer"`.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::TempCreated => "element:create",
            EventKind::TempUpdated => "element:update-temp",
            EventKind::TempRemoved => "element:remove-temp",
            EventKind::ElementAdded => "element:add-to-layer",
            EventKind::ElementModified => "element:modified",
            EventKind::ElementSelected => "element:selected",
            EventKind::ElementDeselected => "element:deselected",
            EventKind::ElementsRemoved => "elements:remove",
            EventKind::SelectionBoxStarted => "selection:start-box",
            EventKind::SelectionBoxUpdated => "selection:update-box",
            EventKind::SelectionBoxEnded => "selection:end-box",
            EventKind::LayerAdded => "layer:added",
            EventKind::LayerRemoved => "layer:removed",
            EventKind::LayerActivated => "layer:activated",
            EventKind::LayerModified => "layer:modified",
            EventKind::LayersReordered => "layer:reordered",
            EventKind::ProjectCreated => "project:created",
            EventKind::ProjectLoaded => "project:loaded",
            EventKind::ProjectSaved => "project:saved",
            EventKind::ProjectAutosaved => "project:autosaved",
            EventKind::ProjectUndo => "project:undo",
            EventKind::ProjectRedo => "project:redo",
            EventKind::ProjectReverted => "project:reverted",
            EventKind::SettingsChanged => "project:settings-changed",
            EventKind::SaveFailed => "project:save-error",
            EventKind::LoadFailed => "project:load-error",
            EventKind::ToolChanged => "tool:changed",
            EventKind::Error => "error",
        }
    }

    /// Kinds that describe a reversible mutation of project state.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            EventKind::ElementAdded
                | EventKind::ElementModified
                | EventKind::ElementsRemoved
                | EventKind::LayerModified
                | EventKind::SettingsChanged
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::TempCreated { .. } => EventKind::TempCreated,
            EditorEvent::TempUpdated { .. } => EventKind::TempUpdated,
            EditorEvent::TempRemoved { .. } => EventKind::TempRemoved,
            EditorEvent::ElementAdded { .. } => EventKind::ElementAdded,
            EditorEvent::ElementModified { .. } => EventKind::ElementModified,
            EditorEvent::ElementSelected { .. } => EventKind::ElementSelected,
            EditorEvent::ElementDeselected { .. } => EventKind::ElementDeselected,
            EditorEvent::ElementsRemoved { .. } => EventKind::ElementsRemoved,
            EditorEvent::SelectionBoxStarted { .. } => EventKind::SelectionBoxStarted,
            EditorEvent::SelectionBoxUpdated { .. } => EventKind::SelectionBoxUpdated,
            EditorEvent::SelectionBoxEnded { .. } => EventKind::SelectionBoxEnded,
            EditorEvent::LayerAdded { .. } => EventKind::LayerAdded,
            EditorEvent::LayerRemoved { .. } => EventKind::LayerRemoved,
            EditorEvent::LayerActivated { .. } => EventKind::LayerActivated,
            EditorEvent::LayerModified { .. } => EventKind::LayerModified,
            EditorEvent::LayersReordered { .. } => EventKind::LayersReordered,
            EditorEvent::ProjectCreated { .. } => EventKind::ProjectCreated,
            EditorEvent::ProjectLoaded { .. } => EventKind::ProjectLoaded,
            EditorEvent::ProjectSaved { .. } => EventKind::ProjectSaved,
            EditorEvent::ProjectAutosaved { .. } => EventKind::ProjectAutosaved,
            EditorEvent::ProjectUndo { .. } => EventKind::ProjectUndo,
            EditorEvent::ProjectRedo { .. } => EventKind::ProjectRedo,
            EditorEvent::ProjectReverted { .. } => EventKind::ProjectReverted,
            EditorEvent::SettingsChanged { .. } => EventKind::SettingsChanged,
            EditorEvent::SaveFailed { .. } => EventKind::SaveFailed,
            EditorEvent::LoadFailed { .. } => EventKind::LoadFailed,
            EditorEvent::ToolChanged { .. } => EventKind::ToolChanged,
            EditorEvent::Error { .. } => EventKind::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = EditorEvent::TempRemoved { id: uuid::Uuid::nil() };
        assert_eq!(event.name(), "element:remove-temp");
        assert_eq!(EventKind::ElementsRemoved.to_string(), "elements:remove");
    }

    #[test]
    fn test_mutation_kinds() {
        assert!(EventKind::ElementAdded.is_mutation());
        assert!(EventKind::SettingsChanged.is_mutation());
        assert!(!EventKind::TempUpdated.is_mutation());
        assert!(!EventKind::ProjectUndo.is_mutation());
    }

    #[test]
    fn test_serialized_tag() {
        let event = EditorEvent::LayerActivated { id: LayerId::new("roads") };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "layerActivated");
        assert_eq!(json["id"], "roads");
    }
}
