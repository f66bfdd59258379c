//! Editing session: the one value that owns all mutable editor state.
//!
//! The session routes input to the active tool, applies the effects the tool
//! queued, and publishes every change on its [`EventBus`]. External
//! collaborators (renderer, property panel, persistence UI) only ever see the
//! bus and the read-only copies returned here.

use crate::bus::EventBus;
use crate::config::EditorConfig;
use crate::element::{Element, ElementId};
use crate::events::EditorEvent;
use crate::history::{HistoryManager, ProjectVersion};
use crate::input::InputEvent;
use crate::layer::{Layer, LayerId, LayerProps};
use crate::project::{ProjectMeta, ProjectSettings, ProjectSnapshot, Viewport};
use crate::storage::{AutoSaveManager, MemoryStorage, Storage};
use crate::store::{ElementStore, Mutation};
use crate::tools::{Effect, ToolContext, ToolController, ToolKind, ToolSettings};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// An interactive editing session over one project.
pub struct Editor {
    config: EditorConfig,
    bus: Rc<EventBus>,
    store: ElementStore,
    tools: ToolController,
    settings: ToolSettings,
    selection: Vec<ElementId>,
    history: Rc<RefCell<HistoryManager>>,
    project: ProjectMeta,
    viewport: Viewport,
    autosave: AutoSaveManager,
}

impl Editor {
    /// A session over an untitled project, persisting to `storage`.
    pub fn new(config: EditorConfig, storage: Arc<dyn Storage>) -> Self {
        let bus = Rc::new(EventBus::new());
        let history = Rc::new(RefCell::new(HistoryManager::from_config(&config)));
        HistoryManager::attach(&history, &bus);
        let autosave =
            AutoSaveManager::new(storage).with_interval(Duration::from_secs(config.autosave_interval_secs));
        Self {
            config,
            bus,
            store: ElementStore::new(),
            tools: ToolController::new(),
            settings: ToolSettings::default(),
            selection: Vec::new(),
            history,
            project: ProjectMeta::new("Untitled"),
            viewport: Viewport::default(),
            autosave,
        }
    }

    /// A session backed by in-memory storage.
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }

    /// The session's event bus, for external subscribers.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---- tools -------------------------------------------------------------

    pub fn tool(&self) -> ToolKind {
        self.tools.kind()
    }

    /// Switch the active tool. Returns false if it was already active.
    pub fn set_tool(&mut self, kind: ToolKind) -> bool {
        self.run_tool(|tools, ctx| tools.set_tool(ctx, kind))
    }

    /// Route one input event to the active tool.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.run_tool(|tools, ctx| tools.handle(ctx, event));
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_tool_settings(&mut self, settings: ToolSettings) {
        self.settings = settings;
    }

    /// Abandon any in-progress gesture.
    pub fn cancel_gesture(&mut self) {
        self.run_tool(|tools, ctx| tools.cancel(ctx));
    }

    fn run_tool<R>(&mut self, f: impl FnOnce(&mut ToolController, &mut ToolContext<'_>) -> R) -> R {
        let mut ctx = ToolContext::new(&self.store, &self.config, &mut self.settings, &mut self.selection);
        let result = f(&mut self.tools, &mut ctx);
        let effects = ctx.into_effects();
        self.dispatch(effects);
        result
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Notify(event) => {
                    self.bus.emit(&event);
                }
                Effect::Mutate(mutation) => {
                    self.apply(mutation);
                }
            }
        }
    }

    /// Apply a mutation and publish its event. Refusals are logged no-ops.
    fn apply(&mut self, mutation: Mutation) -> bool {
        match self.store.apply(mutation) {
            Ok(event) => {
                self.project.touch();
                self.autosave.mark_dirty();
                self.bus.emit(&event);
                self.prune_selection();
                true
            }
            Err(err) => {
                log::warn!("Mutation refused: {}", err);
                false
            }
        }
    }

    /// Drop selected ids whose elements are gone and announce each one.
    fn prune_selection(&mut self) {
        let (kept, dropped): (Vec<ElementId>, Vec<ElementId>) =
            self.selection.iter().partition(|id| self.store.contains(**id));
        self.selection = kept;
        for id in dropped {
            self.bus.emit(&EditorEvent::ElementDeselected { id });
        }
    }

    // ---- reads -------------------------------------------------------------

    pub fn layers(&self) -> Vec<Layer> {
        self.store.layers()
    }

    pub fn layer(&self, id: &LayerId) -> Option<Layer> {
        self.store.layer(id)
    }

    pub fn elements(&self) -> Vec<Element> {
        self.store.elements()
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.store.element(id)
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.store.active_layer_id()
    }

    pub fn active_layer_index(&self) -> usize {
        self.store.active_index()
    }

    pub fn selection(&self) -> Vec<ElementId> {
        self.selection.clone()
    }

    /// Read access to the element store.
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    // ---- element editing ---------------------------------------------------

    /// Commit a prepared element into the layer it names.
    pub fn add_element(&mut self, element: Element) -> bool {
        self.apply(Mutation::AddElement(element))
    }

    /// Edit a copy of an element and write it back if it changed.
    pub fn update_element(&mut self, id: ElementId, edit: impl FnOnce(&mut Element)) -> bool {
        let Some(before) = self.store.element(id) else {
            log::warn!("Cannot update {}: not found", id);
            return false;
        };
        let mut after = before.clone();
        edit(&mut after);
        after.id = id;
        if after == before {
            return false;
        }
        self.apply(Mutation::UpdateElement(after))
    }

    pub fn delete_element(&mut self, id: ElementId) -> bool {
        self.apply(Mutation::RemoveElements(vec![id]))
    }

    // ---- layers ------------------------------------------------------------

    /// Add a drawable layer on top. Returns its id.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let event = self.store.add_layer(name);
        let id = match &event {
            EditorEvent::LayerAdded { layer } => layer.id.clone(),
            _ => self.store.active_layer_id(),
        };
        self.autosave.mark_dirty();
        self.bus.emit(&event);
        id
    }

    /// Remove a drawable layer and its elements. Cancels any gesture first.
    pub fn remove_layer(&mut self, id: &LayerId) -> bool {
        self.cancel_gesture();
        let active_before = self.store.active_layer_id();
        match self.store.remove_layer(id) {
            Ok(event) => {
                self.autosave.mark_dirty();
                self.bus.emit(&event);
                self.prune_selection();
                let active = self.store.active_layer_id();
                if active != active_before {
                    self.bus.emit(&EditorEvent::LayerActivated { id: active });
                }
                true
            }
            Err(err) => {
                log::warn!("Cannot remove layer {}: {}", id, err);
                false
            }
        }
    }

    /// Move a layer one step up (`+1`) or down (`-1`).
    pub fn move_layer(&mut self, id: &LayerId, delta: i32) -> bool {
        match self.store.move_layer(id, delta) {
            Ok(event) => {
                self.autosave.mark_dirty();
                self.bus.emit(&event);
                true
            }
            Err(err) => {
                log::warn!("Cannot move layer {}: {}", id, err);
                false
            }
        }
    }

    /// Make `id` the drawing target. A gesture started on another layer is cancelled.
    pub fn set_active_layer(&mut self, id: &LayerId) -> bool {
        if *id != self.store.active_layer_id() {
            self.cancel_gesture();
        }
        match self.store.set_active_layer(id) {
            Ok(event) => {
                self.bus.emit(&event);
                true
            }
            Err(err) => {
                log::warn!("Cannot activate layer {}: {}", id, err);
                false
            }
        }
    }

    pub fn update_layer(&mut self, id: &LayerId, edit: impl FnOnce(&mut LayerProps)) -> bool {
        let Some(layer) = self.store.layer(id) else {
            log::warn!("Cannot update layer {}: not found", id);
            return false;
        };
        let before = layer.props();
        let mut after = before.clone();
        edit(&mut after);
        if after == before {
            return false;
        }
        if after.locked && !before.locked {
            self.cancel_gesture();
        }
        match self.store.update_layer(id, after) {
            Ok(event) => {
                self.autosave.mark_dirty();
                self.bus.emit(&event);
                true
            }
            Err(err) => {
                log::warn!("Cannot update layer {}: {}", id, err);
                false
            }
        }
    }

    // ---- project -----------------------------------------------------------

    pub fn project(&self) -> &ProjectMeta {
        &self.project
    }

    pub fn update_settings(&mut self, edit: impl FnOnce(&mut ProjectSettings)) -> bool {
        let before = self.project.settings();
        let mut after = before.clone();
        edit(&mut after);
        if after == before {
            return false;
        }
        if after.name.trim().is_empty() {
            log::warn!("Project name cannot be empty");
            return false;
        }
        self.project.apply_settings(after.clone());
        self.autosave.mark_dirty();
        self.bus.emit(&EditorEvent::SettingsChanged { before, after });
        true
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record pan/zoom state so snapshots carry it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Full copy of the session state.
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::capture(&self.project, &self.store, self.viewport)
    }

    /// Start over with an empty project.
    pub fn new_project(&mut self, name: impl Into<String>) {
        self.cancel_gesture();
        self.project = ProjectMeta::new(name);
        self.store = ElementStore::new();
        self.viewport = Viewport::default();
        self.reset_session_state();
        log::info!("Created project {}", self.project.id);
        self.bus.emit(&EditorEvent::ProjectCreated {
            project: self.project.clone(),
        });
    }

    /// Replace the session state with a snapshot.
    pub fn load_snapshot(&mut self, snapshot: ProjectSnapshot) {
        self.replace_state(snapshot);
        log::info!("Loaded project {}", self.project.id);
        self.bus.emit(&EditorEvent::ProjectLoaded {
            project: self.project.clone(),
        });
    }

    fn replace_state(&mut self, snapshot: ProjectSnapshot) {
        self.cancel_gesture();
        self.store = ElementStore::from_parts(snapshot.layers, snapshot.elements);
        self.project = snapshot.project;
        self.viewport = snapshot.viewport;
        self.reset_session_state();
    }

    /// Selection and undo state do not survive a wholesale reload.
    fn reset_session_state(&mut self) {
        self.selection.clear();
        self.history.borrow_mut().clear();
    }

    // ---- persistence -------------------------------------------------------

    /// Load a project from storage. Failures surface as `project:load-error`.
    pub async fn load_project(&mut self, id: &str) -> bool {
        match self.autosave.load(id).await {
            Ok(snapshot) => {
                self.load_snapshot(snapshot);
                true
            }
            Err(err) => {
                log::error!("Failed to load project {}: {}", id, err);
                self.bus.emit(&EditorEvent::LoadFailed {
                    project_id: id.to_string(),
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Save now and keep the snapshot as a version.
    pub async fn save(&mut self) -> bool {
        self.project.version += 1;
        let snapshot = self.snapshot();
        let project_id = self.project.id.clone();
        match self.autosave.save(&snapshot).await {
            Ok(true) => {
                let version = self.history.borrow_mut().add_version(snapshot);
                log::info!("Saved project {} as version {}", project_id, version);
                self.bus.emit(&EditorEvent::ProjectSaved { project_id, version });
                true
            }
            Ok(false) => {
                self.project.version -= 1;
                false
            }
            Err(err) => {
                self.project.version -= 1;
                log::error!("Failed to save project {}: {}", project_id, err);
                self.bus.emit(&EditorEvent::SaveFailed {
                    project_id,
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Save if there are changes and the autosave interval has elapsed.
    ///
    /// A tick that finds a save still running is skipped.
    pub async fn autosave_tick(&mut self) -> bool {
        if !self.autosave.is_dirty() {
            return false;
        }
        let snapshot = self.snapshot();
        let project_id = self.project.id.clone();
        match self.autosave.maybe_save(&snapshot).await {
            Ok(true) => {
                let version = self.history.borrow_mut().add_version(snapshot);
                log::debug!("Autosaved project {} as version {}", project_id, version);
                self.bus.emit(&EditorEvent::ProjectAutosaved { project_id, version });
                true
            }
            Ok(false) => false,
            Err(err) => {
                log::error!("Autosave of {} failed: {}", project_id, err);
                self.bus.emit(&EditorEvent::SaveFailed {
                    project_id,
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Kept versions of the current project, oldest first.
    pub fn versions(&self) -> Vec<ProjectVersion> {
        self.history.borrow().versions().list(&self.project.id)
    }

    /// Reload a kept version wholesale. Undo and redo are cleared.
    pub fn revert_to_version(&mut self, index: usize) -> bool {
        let version = self
            .history
            .borrow()
            .versions()
            .get(&self.project.id, index)
            .cloned();
        let Some(version) = version else {
            log::warn!("No version {} for project {}", index, self.project.id);
            return false;
        };
        let project_id = self.project.id.clone();
        self.replace_state(version.snapshot);
        self.autosave.mark_dirty();
        log::info!("Reverted project {} to version {}", project_id, index);
        self.bus.emit(&EditorEvent::ProjectReverted { project_id, index });
        true
    }

    // ---- history -----------------------------------------------------------

    /// Undo the newest recorded action. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let entry = self.history.borrow_mut().undo(&mut self.store, &mut self.project);
        let Some(entry) = entry else {
            return false;
        };
        self.autosave.mark_dirty();
        self.bus.emit(&EditorEvent::ProjectUndo { entry });
        self.prune_selection();
        true
    }

    /// Redo the newest undone action. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let entry = self.history.borrow_mut().redo(&mut self.store, &mut self.project);
        let Some(entry) = entry else {
            return false;
        };
        self.autosave.mark_dirty();
        self.bus.emit(&EditorEvent::ProjectRedo { entry });
        self.prune_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.borrow().can_redo()
    }

    /// Read access to the history manager.
    pub fn history(&self) -> Ref<'_, HistoryManager> {
        self.history.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use crate::events::EventKind;
    use crate::input::Modifiers;
    use crate::storage::{BoxFuture, StorageError, StorageResult};
    use kurbo::Point;
    use pollster::block_on;

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
        let m = Modifiers::NONE;
        editor.handle_input(InputEvent::PointerDown { x: from.0, y: from.1, modifiers: m });
        editor.handle_input(InputEvent::PointerMove { x: to.0, y: to.1, modifiers: m });
        editor.handle_input(InputEvent::PointerUp { x: to.0, y: to.1, modifiers: m });
    }

    fn names(editor: &Editor) -> Rc<RefCell<Vec<&'static str>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        editor.bus().on_any(move |event| {
            sink.borrow_mut().push(event.name());
            Ok(())
        });
        log
    }

    #[test]
    fn test_draw_emits_and_records() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let log = names(&editor);
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (0.0, 0.0), (60.0, 40.0));

        assert_eq!(editor.elements().len(), 1);
        assert!(editor.can_undo());
        assert_eq!(
            *log.borrow(),
            vec![
                "tool:changed",
                "element:create",
                "element:update-temp",
                "element:update-temp",
                "element:remove-temp",
                "element:add-to-layer"
            ]
        );
    }

    #[test]
    fn test_refused_mutation_is_silent() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let log = names(&editor);
        let mut element = Element::new(ShapeKind::Rect, "zone", LayerId::base());
        element.set_box(Point::ZERO, Point::new(10.0, 10.0));
        assert!(!editor.add_element(element));
        assert!(log.borrow().is_empty());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_update_and_delete_element() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let mut element = Element::new(ShapeKind::Rect, "zone", editor.active_layer_id());
        element.set_box(Point::ZERO, Point::new(10.0, 10.0));
        let id = element.id;
        assert!(editor.add_element(element));

        assert!(editor.update_element(id, |e| e.name = "Yard".to_string()));
        assert!(!editor.update_element(id, |e| e.name = "Yard".to_string()));
        assert!(editor.update_element(id, |e| e.locked = true));
        assert!(!editor.update_element(id, |e| e.x = 99.0));
        assert!(!editor.delete_element(id));
        assert!(editor.update_element(id, |e| e.locked = false));
        assert!(editor.delete_element(id));
        assert!(editor.elements().is_empty());

        while editor.undo() {}
        assert!(editor.elements().is_empty());
        assert_eq!(editor.history().redo_entries().len(), 5);
    }

    #[test]
    fn test_settings_undo_redo() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        assert!(editor.update_settings(|s| s.name = "Substation".to_string()));
        assert!(!editor.update_settings(|s| s.name = "  ".to_string()));
        assert!(editor.undo());
        assert_eq!(editor.project().name, "Untitled");
        assert!(editor.redo());
        assert_eq!(editor.project().name, "Substation");
    }

    #[test]
    fn test_layer_props_recorded_but_not_add_remove() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let id = editor.add_layer("Cables");
        assert!(!editor.can_undo());
        assert!(editor.update_layer(&id, |p| p.visible = false));
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert!(editor.layer(&id).unwrap().visible);
        assert!(!editor.update_layer(&LayerId::base(), |p| p.locked = false));
    }

    #[test]
    fn test_remove_active_layer_announces_new_active() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let second = editor.add_layer("Second");
        editor.set_active_layer(&second);
        let log = names(&editor);
        assert!(editor.remove_layer(&second));
        assert_eq!(*log.borrow(), vec!["layer:removed", "layer:activated"]);
        assert!(editor.active_layer_index() < editor.layers().len());
    }

    #[test]
    fn test_save_versions_and_revert() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (0.0, 0.0), (40.0, 40.0));
        assert!(block_on(editor.save()));
        assert_eq!(editor.project().version, 1);

        drag(&mut editor, (100.0, 100.0), (140.0, 140.0));
        assert_eq!(editor.elements().len(), 2);

        let log = names(&editor);
        assert!(editor.revert_to_version(0));
        assert_eq!(editor.elements().len(), 1);
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert_eq!(*log.borrow(), vec!["project:reverted"]);
        assert!(!editor.revert_to_version(7));
        assert_eq!(editor.versions().len(), 1);
    }

    #[test]
    fn test_autosave_tick_only_when_dirty() {
        let config = EditorConfig {
            autosave_interval_secs: 0,
            ..EditorConfig::default()
        };
        let mut editor = Editor::in_memory(config);
        assert!(!block_on(editor.autosave_tick()));

        editor.update_settings(|s| s.description = "changed".to_string());
        assert!(block_on(editor.autosave_tick()));
        assert!(!block_on(editor.autosave_tick()));
        assert_eq!(editor.versions().len(), 1);
    }

    #[test]
    fn test_load_round_trip_and_failure() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut editor = Editor::new(EditorConfig::default(), Arc::clone(&storage));
        editor.set_tool(ToolKind::Circle);
        drag(&mut editor, (0.0, 0.0), (40.0, 0.0));
        assert!(block_on(editor.save()));
        let id = editor.project().id.clone();
        let saved = editor.snapshot();

        let mut other = Editor::new(EditorConfig::default(), storage);
        let errors = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&errors);
        other.bus().on(EventKind::LoadFailed, move |_| {
            *sink.borrow_mut() += 1;
            Ok(())
        });
        assert!(!block_on(other.load_project("missing")));
        assert_eq!(*errors.borrow(), 1);

        assert!(block_on(other.load_project(&id)));
        assert_eq!(other.snapshot(), saved);
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn save(&self, _id: &str, _snapshot: &ProjectSnapshot) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".to_string())) })
        }
        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectSnapshot>> {
            let id = id.to_string();
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }
        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn exists(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_save_failure_surfaces_event_and_keeps_history() {
        let mut editor = Editor::new(EditorConfig::default(), Arc::new(FailingStorage));
        assert!(editor.update_settings(|s| s.name = "Plant".to_string()));
        let log = names(&editor);

        assert!(!block_on(editor.save()));
        assert_eq!(*log.borrow(), vec!["project:save-error"]);
        assert_eq!(editor.project().version, 0);
        assert!(editor.can_undo());
        assert!(editor.versions().is_empty());
    }

    #[test]
    fn test_undo_drops_selection_of_vanished_elements() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (0.0, 0.0), (40.0, 40.0));
        editor.set_tool(ToolKind::Select);
        editor.handle_input(InputEvent::PointerDown { x: 20.0, y: 20.0, modifiers: Modifiers::NONE });
        editor.handle_input(InputEvent::PointerUp { x: 20.0, y: 20.0, modifiers: Modifiers::NONE });
        assert_eq!(editor.selection().len(), 1);
        let selected = editor.selection()[0];

        let deselected = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&deselected);
        editor.bus().on(EventKind::ElementDeselected, move |event| {
            if let EditorEvent::ElementDeselected { id } = event {
                sink.borrow_mut().push(*id);
            }
            Ok(())
        });

        assert!(editor.undo());
        assert!(editor.selection().is_empty());
        assert_eq!(*deselected.borrow(), vec![selected]);

        assert!(editor.redo());
        assert!(editor.selection().is_empty());
        assert_eq!(deselected.borrow().len(), 1);
    }

    #[test]
    fn test_removing_layer_deselects_its_elements() {
        let mut editor = Editor::in_memory(EditorConfig::default());
        let top = editor.add_layer("Top");
        editor.set_active_layer(&top);
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (0.0, 0.0), (40.0, 40.0));
        editor.set_tool(ToolKind::Select);
        editor.handle_input(InputEvent::PointerDown { x: 20.0, y: 20.0, modifiers: Modifiers::NONE });
        editor.handle_input(InputEvent::PointerUp { x: 20.0, y: 20.0, modifiers: Modifiers::NONE });
        assert_eq!(editor.selection().len(), 1);

        let log = names(&editor);
        assert!(editor.remove_layer(&top));
        assert!(editor.selection().is_empty());
        assert_eq!(
            *log.borrow(),
            vec!["layer:removed", "element:deselected", "layer:activated"]
        );
    }

    #[test]
    fn test_switching_layer_cancels_polygon_in_progress() {
        let mut editor = Editor::in_memory(EditorConfig::default().without_snapping());
        let first = editor.active_layer_id();
        editor.set_tool(ToolKind::Polygon);
        for (x, y) in [(0.0, 0.0), (50.0, 0.0)] {
            editor.handle_input(InputEvent::PointerDown { x, y, modifiers: Modifiers::NONE });
            editor.handle_input(InputEvent::PointerUp { x, y, modifiers: Modifiers::NONE });
        }

        let second = editor.add_layer("Second");
        let log = names(&editor);
        assert!(editor.set_active_layer(&second));
        assert_eq!(*log.borrow(), vec!["element:remove-temp", "layer:activated"]);

        editor.handle_input(InputEvent::DoubleClick { x: 50.0, y: 50.0, modifiers: Modifiers::NONE });
        assert!(editor.elements().is_empty());
        assert!(editor.layer(&first).unwrap().elements.is_empty());

        for (x, y) in [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)] {
            editor.handle_input(InputEvent::PointerDown { x, y, modifiers: Modifiers::NONE });
            editor.handle_input(InputEvent::PointerUp { x, y, modifiers: Modifiers::NONE });
        }
        editor.handle_input(InputEvent::DoubleClick { x: 0.0, y: 50.0, modifiers: Modifiers::NONE });
        let elements = editor.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].layer_id, second);
    }

    #[test]
    fn test_locking_active_layer_cancels_gesture() {
        let mut editor = Editor::in_memory(EditorConfig::default().without_snapping());
        let layer = editor.active_layer_id();
        editor.set_tool(ToolKind::Rectangle);
        editor.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0, modifiers: Modifiers::NONE });
        editor.handle_input(InputEvent::PointerMove { x: 40.0, y: 40.0, modifiers: Modifiers::NONE });

        assert!(editor.update_layer(&layer, |p| p.locked = true));
        editor.handle_input(InputEvent::PointerUp { x: 40.0, y: 40.0, modifiers: Modifiers::NONE });
        assert!(editor.elements().is_empty());
    }
}
