//! Mapnote Core Library
//!
//! Interactive editing core for map annotations: layered element storage,
//! pointer-driven drawing tools, a synchronous event bus, and undo/redo with
//! versioned snapshots. Rendering and input capture live outside this crate;
//! they talk to an [`Editor`] through [`InputEvent`]s and the [`EventBus`].

pub mod bus;
pub mod config;
pub mod editor;
pub mod element;
pub mod events;
pub mod geometry;
pub mod history;
pub mod input;
pub mod layer;
pub mod project;
pub mod snap;
pub mod storage;
pub mod store;
pub mod tools;

pub use bus::{EventBus, HandlerResult, ListenerError, SubscriptionId};
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{Color, Element, ElementId, ShapeKind, Vertex};
pub use events::{EditorEvent, EventKind, RemovedElement};
pub use history::{HistoryAction, HistoryEntry, HistoryManager, ProjectVersion, VersionHistory};
pub use input::{InputEvent, Key, Modifiers};
pub use layer::{Layer, LayerId, LayerProps};
pub use project::{ProjectMeta, ProjectSettings, ProjectSnapshot, Viewport};
pub use snap::{snap, snap_point, snap_to_grid};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{ElementStore, Mutation, StoreError};
pub use tools::{Tool, ToolController, ToolKind, ToolSettings};
