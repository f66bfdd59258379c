//! Layers: ordered containers of element ids.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the permanently locked base layer.
pub const BASE_LAYER_ID: &str = "base";

/// Layer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a user-created layer.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The base layer id.
    pub fn base() -> Self {
        Self(BASE_LAYER_ID.to_string())
    }

    pub fn is_base(&self) -> bool {
        self.0 == BASE_LAYER_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The user-editable properties of a layer (everything except its contents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProps {
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
}

/// A named, ordered set of elements.
///
/// `elements` is the z-order (back to front): the last id is topmost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
    pub elements: Vec<ElementId>,
}

impl Layer {
    /// Create an empty, visible, unlocked layer.
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            opacity: 1.0,
            elements: Vec::new(),
        }
    }

    /// The base ("project") layer, which never accepts user-drawn elements.
    pub fn base() -> Self {
        Self {
            locked: true,
            ..Self::new(LayerId::base(), "Project")
        }
    }

    pub fn is_base(&self) -> bool {
        self.id.is_base()
    }

    /// Whether new elements may be drawn onto this layer.
    pub fn accepts_drawing(&self) -> bool {
        !self.is_base() && !self.locked
    }

    pub fn props(&self) -> LayerProps {
        LayerProps {
            name: self.name.clone(),
            visible: self.visible,
            locked: self.locked,
            opacity: self.opacity,
        }
    }

    pub fn set_props(&mut self, props: LayerProps) {
        self.name = props.name;
        self.visible = props.visible;
        self.locked = props.locked;
        self.opacity = props.opacity;
    }

    /// Position of an element in this layer's z-order.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|&e| e == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layer_refuses_drawing() {
        let base = Layer::base();
        assert!(base.is_base());
        assert!(base.locked);
        assert!(!base.accepts_drawing());

        let mut unlocked_base = Layer::base();
        unlocked_base.locked = false;
        assert!(!unlocked_base.accepts_drawing());
    }

    #[test]
    fn test_props_round_trip() {
        let mut layer = Layer::new(LayerId::new("roads"), "Roads");
        let mut props = layer.props();
        props.opacity = 0.5;
        props.locked = true;
        layer.set_props(props.clone());
        assert_eq!(layer.props(), props);
        assert!(!layer.accepts_drawing());
    }
}
