//! Shared numeric and colour constants for the canvas crate.

// ── Handles ─────────────────────────────────────────────────────

/// Side length of a square handle glyph and its hit zone, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Distance from a shape's top edge (or a line's midpoint) to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 20.0;

/// Extra slop added to a line's stroke width when hit-testing it.
pub const LINE_HIT_MARGIN: f64 = 5.0;

// ── Camera ──────────────────────────────────────────────────────

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom multiplier applied per wheel notch towards the user (zoom in).
pub const ZOOM_IN_STEP: f64 = 1.1;

/// Zoom multiplier applied per wheel notch away from the user (zoom out).
pub const ZOOM_OUT_STEP: f64 = 0.9;

// ── Shapes ──────────────────────────────────────────────────────

/// Arrowhead side length in world units.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

/// Font size assigned to newly committed text.
pub const DEFAULT_TEXT_SIZE: f64 = 16.0;

/// Smallest font size reachable through the text resize handle.
pub const MIN_TEXT_SIZE: f64 = 10.0;

/// Largest font size reachable through the text resize handle.
pub const MAX_TEXT_SIZE: f64 = 72.0;

/// Fixed stroke width of eraser paths.
pub const ERASER_WIDTH: f64 = 10.0;

/// Font family used for text shapes.
pub const TEXT_FONT_FAMILY: &str = "Arial";

// ── Colours ─────────────────────────────────────────────────────

/// Opaque canvas background. Eraser paths paint with the same colour.
pub const BACKGROUND_COLOR: &str = "#000000";

/// Sentinel background colour meaning "no fill".
pub const TRANSPARENT: &str = "transparent";

/// Selection outline and handle stroke colour.
pub const SELECTION_COLOR: &str = "#4D88FF";

/// Rotate handle fill colour.
pub const ROTATE_HANDLE_COLOR: &str = "#4CAF50";

/// Marquee and selection outline dash segment, in screen pixels.
pub const SELECTION_DASH_PX: f64 = 5.0;

// ── Style defaults ──────────────────────────────────────────────

/// Outline colour for new shapes before the user picks one.
pub const DEFAULT_STROKE_COLOR: &str = "#FFFFFF";

/// Outline width for new shapes before the user picks one.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
