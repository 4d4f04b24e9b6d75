//! Tool system for the canvas.
//!
//! The current tool is process-wide state shared by the toolbar, the keyboard
//! handler and the canvas through a [`ToolStore`] handle.

use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pan,
    Select,
    #[default]
    Rectangle,
    Line,
    Ellipse,
}

impl ToolKind {
    /// All tools, in toolbar order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pan,
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Line,
        ToolKind::Ellipse,
    ];

    /// Toolbar identifier for this tool.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Pan => "pan",
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Line => "line",
            ToolKind::Ellipse => "ellipse",
        }
    }

    /// Look up a tool by toolbar identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.id() == id)
    }

    /// Shape created by this tool, if it draws one.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Pan | ToolKind::Select => None,
        }
    }

    /// Tool bound to a physical key.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        TOOL_SHORTCUTS
            .iter()
            .find(|shortcut| shortcut.code == code)
            .map(|shortcut| shortcut.tool)
    }
}

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Pan,
    Select,
    Draw,
    Move,
    Resize,
}

impl Action {
    /// Mode a tool starts in.
    pub fn from_tool(tool: ToolKind) -> Self {
        match tool {
            ToolKind::Pan => Action::Pan,
            ToolKind::Select => Action::Select,
            ToolKind::Rectangle | ToolKind::Line | ToolKind::Ellipse => Action::Draw,
        }
    }
}

/// A keyboard binding for a tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolShortcut {
    pub code: KeyCode,
    pub tool: ToolKind,
}

/// Digit-key tool bindings.
pub const TOOL_SHORTCUTS: &[ToolShortcut] = &[
    ToolShortcut {
        code: KeyCode::Digit1,
        tool: ToolKind::Pan,
    },
    ToolShortcut {
        code: KeyCode::Digit2,
        tool: ToolKind::Select,
    },
    ToolShortcut {
        code: KeyCode::Digit3,
        tool: ToolKind::Rectangle,
    },
    ToolShortcut {
        code: KeyCode::Digit4,
        tool: ToolKind::Line,
    },
    ToolShortcut {
        code: KeyCode::Digit5,
        tool: ToolKind::Ellipse,
    },
];

/// Shared handle to the current tool.
///
/// Cloning yields another handle to the same state. Single-threaded.
#[derive(Debug, Clone, Default)]
pub struct ToolStore {
    current: Rc<Cell<ToolKind>>,
}

impl ToolStore {
    /// Create a store starting at `tool`.
    pub fn new(tool: ToolKind) -> Self {
        Self {
            current: Rc::new(Cell::new(tool)),
        }
    }

    pub fn current(&self) -> ToolKind {
        self.current.get()
    }

    pub fn set(&self, tool: ToolKind) {
        let previous = self.current.replace(tool);
        if previous != tool {
            log::debug!("Tool changed: {} -> {}", previous.id(), tool.id());
        }
    }
}

/// Apply a document-level key press to the tool store.
///
/// Returns true if the key selected a tool.
pub fn handle_key_down(store: &ToolStore, key: PhysicalKey) -> bool {
    let PhysicalKey::Code(code) = key else {
        return false;
    };
    match ToolKind::from_key_code(code) {
        Some(tool) => {
            store.set(tool);
            true
        }
        None => false,
    }
}
