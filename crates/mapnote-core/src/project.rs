//! Project metadata and the serializable snapshot layout.

use crate::element::Element;
use crate::layer::Layer;
use crate::store::ElementStore;
use chrono::{DateTime, Utc};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// User-editable project settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Project header stored in every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Incremented on every save.
    pub version: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ProjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            created_at: now,
            last_modified: now,
            version: 0,
            metadata: Map::new(),
        }
    }

    pub fn settings(&self) -> ProjectSettings {
        ProjectSettings {
            name: self.name.clone(),
            description: self.description.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn apply_settings(&mut self, settings: ProjectSettings) {
        self.name = settings.name;
        self.description = settings.description;
        self.metadata = settings.metadata;
        self.touch();
    }

    /// Bump `last_modified` to now.
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// Pan/zoom state owned by the external viewport collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scale: f64,
    pub pan_offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan_offset: Vec2::ZERO,
        }
    }
}

/// Full serialized copy of a project at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: ProjectMeta,
    pub layers: Vec<Layer>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl ProjectSnapshot {
    /// Copy the current state of a session.
    pub fn capture(project: &ProjectMeta, store: &ElementStore, viewport: Viewport) -> Self {
        let (layers, elements) = store.to_parts();
        Self {
            project: project.clone(),
            layers,
            elements,
            viewport,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
