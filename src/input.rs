//! Inbound events.
//!
//! Pointer coordinates are canvas-local. Keyboard and text events are scoped
//! to the node whose inline editor has focus.

use crate::Point;
use ulid::Ulid;

/// A normalized input event from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { point: Point },

    PointerMove { point: Point },

    /// Pointer released anywhere, including outside every node
    PointerUp { point: Point },

    DoubleClick { point: Point },

    /// Key pressed inside a focused content editor
    Key {
        node_id: Ulid,
        key: EditKey,
        shift: bool,
    },

    /// Full editor value after a keystroke
    TextInput { node_id: Ulid, text: String },

    /// Editor lost focus
    Blur { node_id: Ulid },
}

/// Keys the core reacts to inside an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            point: Point::new(x, y),
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            point: Point::new(x, y),
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            point: Point::new(x, y),
        }
    }

    pub fn double_click(x: f32, y: f32) -> Self {
        Self::DoubleClick {
            point: Point::new(x, y),
        }
    }
}

