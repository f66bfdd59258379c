//! Input events in editing-surface coordinates.
//!
//! Pointer positions arrive already transformed by the viewport; nothing in
//! the core works with screen pixels.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// Keys the editing tools react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Enter,
}

impl Key {
    /// Map a key name as reported by a windowing layer (`"Escape"`, `"Del"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Escape" | "Esc" => Some(Key::Escape),
            "Delete" | "Del" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            "Enter" | "Return" => Some(Key::Enter),
            _ => None,
        }
    }

    /// Whether the key deletes the selection.
    pub fn is_delete(self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }
}

/// One raw input event routed to the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown { key: Key },
}

impl InputEvent {
    /// Pointer position, if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match *self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerUp { x, y, .. }
            | InputEvent::DoubleClick { x, y, .. } => Some(Point::new(x, y)),
            InputEvent::KeyDown { .. } => None,
        }
    }
}
