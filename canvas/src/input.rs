//! Input model: tools, cursors, pointer/key types, and the gesture state machine.
//!
//! `Tool` captures what a pointer-down will do. `InputState` is the active
//! gesture tracked between pointer-down and pointer-up, carrying everything
//! needed to compute incremental deltas, commit on release, or roll back on
//! cancel.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use crate::camera::Point;
use crate::doc::Shape;
use crate::hit::Handle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    Rect,
    Circle,
    Diamond,
    Line,
    Arrow,
    /// Freehand stroke in the current colour.
    Pencil,
    /// Freehand stroke in the background colour.
    Eraser,
    /// Place a single line of text.
    Text,
}

impl Tool {
    /// Tool name as used by the toolbar and in shape `type` tags.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Pencil => "pencil",
            Self::Eraser => "eraser",
            Self::Text => "text",
        }
    }

    /// Canvas cursor while this tool is active and no handle is hovered.
    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Select => Cursor::Default,
            Self::Text => Cursor::Text,
            _ => Cursor::Crosshair,
        }
    }
}

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "rect" => Ok(Self::Rect),
            "circle" => Ok(Self::Circle),
            "diamond" => Ok(Self::Diamond),
            "line" => Ok(Self::Line),
            "arrow" => Ok(Self::Arrow),
            "pencil" => Ok(Self::Pencil),
            "eraser" => Ok(Self::Eraser),
            "text" => Ok(Self::Text),
            other => Err(UnknownTool(other.to_owned())),
        }
    }
}

/// Canvas cursor advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Text,
    Grab,
    Move,
    NwseResize,
    NeswResize,
    NsResize,
    EwResize,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Text => "text",
            Self::Grab => "grab",
            Self::Move => "move",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
            Self::NsResize => "ns-resize",
            Self::EwResize => "ew-resize",
        }
    }

    /// Cursor shown while hovering `handle`.
    #[must_use]
    pub fn for_handle(handle: Handle) -> Self {
        match handle {
            Handle::Rotate => Self::Grab,
            Handle::Tl | Handle::Br => Self::NwseResize,
            Handle::Tr | Handle::Bl => Self::NeswResize,
            Handle::Top | Handle::Bottom => Self::NsResize,
            Handle::Left | Handle::Right | Handle::Resize => Self::EwResize,
            Handle::Start | Handle::End => Self::Move,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Vertical scroll amount in pixels (positive = away from the user).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Store index of the selected shape, if any.
    pub selected: Option<usize>,
    /// Last cursor advisory sent to the host.
    pub cursor: Cursor,
}

/// Internal state for the input state machine.
///
/// Gestures that edit an existing shape keep the shape as it was at
/// pointer-down in `original` so a cancel can restore it.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Rubber-band drawing of a rect, circle, diamond, line or arrow.
    DrawingShape {
        /// World-space pointer-down position.
        start: Point,
        /// World-space position of the latest pointer sample.
        current: Point,
    },
    /// Recording a pencil or eraser stroke.
    FreehandPath {
        /// Points recorded so far, starting with the pointer-down position.
        path: Vec<Point>,
        /// Live cursor position, drawn as a trailing segment.
        current: Point,
    },
    /// The text overlay is open.
    EditingText {
        /// World-space anchor where the text will be committed.
        anchor: Point,
    },
    /// Dragging out a selection marquee over empty canvas.
    MarqueeSelect {
        start: Point,
        current: Point,
    },
    /// Moving the selected shape.
    DraggingShape {
        index: usize,
        /// World-space pointer position at the previous event.
        last_world: Point,
        original: Shape,
    },
    /// Reshaping the selected shape through one of its handles.
    ResizingShape {
        index: usize,
        handle: Handle,
        /// World-space point that stays fixed during the resize (the corner
        /// opposite a box handle). Unused by circles, lines and text.
        anchor: Point,
        original: Shape,
    },
    /// Turning the selected shape with the rotate knob.
    RotatingShape {
        index: usize,
        /// Rotation pivot captured at pointer-down.
        pivot: Point,
        /// Cursor angle about `pivot` at the previous event.
        last_angle: f64,
        original: Shape,
    },
}

impl InputState {
    /// Short tag for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DrawingShape { .. } => "drawing",
            Self::FreehandPath { .. } => "freehand",
            Self::EditingText { .. } => "text",
            Self::MarqueeSelect { .. } => "marquee",
            Self::DraggingShape { .. } => "dragging",
            Self::ResizingShape { .. } => "resizing",
            Self::RotatingShape { .. } => "rotating",
        }
    }
}
