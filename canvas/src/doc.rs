//! Document model: shape records and the ordered in-memory store.
//!
//! A [`Shape`] is a closed sum type with one variant per drawing tool. The
//! wire/storage form is an internally tagged JSON object (`"type": "rect"`,
//! camelCase field names), so a room's blob is simply a JSON array of shapes.
//!
//! [`ShapeStore`] keeps shapes in insertion order. Paint order follows that
//! order; hit-testing walks it in reverse so the last-drawn shape wins.
//! The store performs no I/O and never triggers a redraw on its own.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Dash pattern applied to a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Canvas line-dash segments for this style, in world units.
    #[must_use]
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[5.0, 5.0],
            Self::Dotted => &[2.0, 2.0],
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Geometry shared by rectangles and diamonds: an unrotated box plus rotation about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in radians about the box center. Absent means zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    pub color: String,
    pub bg_color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

/// A circle in canonical center + radius form.
///
/// The bounding box is derived on demand by [`CircleShape::bounds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleShape {
    pub id: ShapeId,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    pub color: String,
    pub bg_color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

impl CircleShape {
    /// Axis-aligned bounding box as `(x, y, width, height)`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.center_x - self.radius,
            self.center_y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Geometry shared by lines and arrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    pub id: ShapeId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    pub color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

impl LineShape {
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.start_x + self.end_x) / 2.0, (self.start_y + self.end_y) / 2.0)
    }
}

/// A freehand pencil stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PencilShape {
    pub id: ShapeId,
    pub path: Vec<Point>,
    pub color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

/// A freehand eraser stroke, painted in the background colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraserShape {
    pub id: ShapeId,
    pub path: Vec<Point>,
    pub stroke_width: f64,
}

/// A single line of text anchored at its baseline-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub id: ShapeId,
    pub x: f64,
    /// Baseline; the glyph box extends upward by `size`.
    pub y: f64,
    pub text: String,
    /// Font size in world units.
    pub size: f64,
    /// Rotation in radians about the anchor `(x, y)`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    pub color: String,
    pub bg_color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

/// The transient selection marquee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarqueeShape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A shape record as stored in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(BoxShape),
    Circle(CircleShape),
    Diamond(BoxShape),
    Line(LineShape),
    Arrow(LineShape),
    Pencil(PencilShape),
    Eraser(EraserShape),
    Text(TextShape),
    Select(MarqueeShape),
}

impl Shape {
    /// The shape's unique id.
    #[must_use]
    pub fn id(&self) -> ShapeId {
        match self {
            Self::Rect(s) | Self::Diamond(s) => s.id,
            Self::Circle(s) => s.id,
            Self::Line(s) | Self::Arrow(s) => s.id,
            Self::Pencil(s) => s.id,
            Self::Eraser(s) => s.id,
            Self::Text(s) => s.id,
            Self::Select(s) => s.id,
        }
    }

    /// The storage tag for this variant (`"rect"`, `"circle"`, ...).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::Circle(_) => "circle",
            Self::Diamond(_) => "diamond",
            Self::Line(_) => "line",
            Self::Arrow(_) => "arrow",
            Self::Pencil(_) => "pencil",
            Self::Eraser(_) => "eraser",
            Self::Text(_) => "text",
            Self::Select(_) => "select",
        }
    }

    /// Whether this is the transient selection marquee.
    #[must_use]
    pub fn is_marquee(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    /// Current rotation in radians. Variants without a rotation report zero.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        match self {
            Self::Rect(s) | Self::Diamond(s) => s.rotation,
            Self::Circle(s) => s.rotation,
            Self::Line(s) | Self::Arrow(s) => s.rotation,
            Self::Text(s) => s.rotation,
            Self::Pencil(_) | Self::Eraser(_) | Self::Select(_) => 0.0,
        }
    }

    /// Point the shape rotates about: the box center, circle center, line
    /// midpoint, or the text anchor.
    #[must_use]
    pub fn pivot(&self) -> Point {
        match self {
            Self::Rect(s) | Self::Diamond(s) => Point::new(s.x + s.width / 2.0, s.y + s.height / 2.0),
            Self::Circle(s) => Point::new(s.center_x, s.center_y),
            Self::Line(s) | Self::Arrow(s) => s.midpoint(),
            Self::Text(s) => Point::new(s.x, s.y),
            Self::Select(s) => Point::new(s.x + s.width / 2.0, s.y + s.height / 2.0),
            Self::Pencil(PencilShape { path, .. }) | Self::Eraser(EraserShape { path, .. }) => path_center(path),
        }
    }

    /// Translate every position-bearing field by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rect(s) | Self::Diamond(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Circle(s) => {
                s.center_x += dx;
                s.center_y += dy;
            }
            Self::Line(s) | Self::Arrow(s) => {
                s.start_x += dx;
                s.start_y += dy;
                s.end_x += dx;
                s.end_y += dy;
            }
            Self::Pencil(PencilShape { path, .. }) | Self::Eraser(EraserShape { path, .. }) => {
                for p in path {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Text(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Select(s) => {
                s.x += dx;
                s.y += dy;
            }
        }
    }

    /// Rotate the shape by `delta` radians.
    ///
    /// Boxes, circles and text accumulate into their `rotation` field. Lines
    /// and arrows rotate both endpoints about their midpoint instead.
    pub fn rotate_by(&mut self, delta: f64) {
        match self {
            Self::Rect(s) | Self::Diamond(s) => s.rotation += delta,
            Self::Circle(s) => s.rotation += delta,
            Self::Text(s) => s.rotation += delta,
            Self::Line(s) | Self::Arrow(s) => {
                let mid = s.midpoint();
                let start = s.start().rotate_about(mid, delta);
                let end = s.end().rotate_about(mid, delta);
                s.start_x = start.x;
                s.start_y = start.y;
                s.end_x = end.x;
                s.end_y = end.y;
            }
            Self::Pencil(_) | Self::Eraser(_) | Self::Select(_) => {}
        }
    }

    /// Set the outline colour. Returns `false` for variants without one.
    pub fn set_stroke_color(&mut self, color: &str) -> bool {
        let slot = match self {
            Self::Rect(s) | Self::Diamond(s) => &mut s.color,
            Self::Circle(s) => &mut s.color,
            Self::Line(s) | Self::Arrow(s) => &mut s.color,
            Self::Pencil(s) => &mut s.color,
            Self::Text(s) => &mut s.color,
            Self::Eraser(_) | Self::Select(_) => return false,
        };
        color.clone_into(slot);
        true
    }

    /// Set the fill colour. Returns `false` for variants without one.
    pub fn set_bg_color(&mut self, color: &str) -> bool {
        let slot = match self {
            Self::Rect(s) | Self::Diamond(s) => &mut s.bg_color,
            Self::Circle(s) => &mut s.bg_color,
            Self::Text(s) => &mut s.bg_color,
            Self::Line(_) | Self::Arrow(_) | Self::Pencil(_) | Self::Eraser(_) | Self::Select(_) => return false,
        };
        color.clone_into(slot);
        true
    }

    /// Set the stroke width. Returns `false` for variants without one.
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        let slot = match self {
            Self::Rect(s) | Self::Diamond(s) => &mut s.stroke_width,
            Self::Circle(s) => &mut s.stroke_width,
            Self::Line(s) | Self::Arrow(s) => &mut s.stroke_width,
            Self::Pencil(s) => &mut s.stroke_width,
            Self::Eraser(s) => &mut s.stroke_width,
            Self::Text(s) => &mut s.stroke_width,
            Self::Select(_) => return false,
        };
        *slot = width;
        true
    }

    /// Set the dash style. Returns `false` for variants without one.
    pub fn set_stroke_style(&mut self, style: StrokeStyle) -> bool {
        let slot = match self {
            Self::Rect(s) | Self::Diamond(s) => &mut s.stroke_style,
            Self::Circle(s) => &mut s.stroke_style,
            Self::Line(s) | Self::Arrow(s) => &mut s.stroke_style,
            Self::Pencil(s) => &mut s.stroke_style,
            Self::Text(s) => &mut s.stroke_style,
            Self::Eraser(_) | Self::Select(_) => return false,
        };
        *slot = style;
        true
    }
}

/// Axis-aligned bounds of a path as `(x, y, width, height)`; `None` when empty.
#[must_use]
pub fn path_bounds(path: &[Point]) -> Option<(f64, f64, f64, f64)> {
    let first = path.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in path {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x - min_x, max_y - min_y))
}

fn path_center(path: &[Point]) -> Point {
    path_bounds(path).map_or_else(Point::default, |(x, y, w, h)| Point::new(x + w / 2.0, y + h / 2.0))
}

/// Insertion-ordered store of a room's shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Replace all shapes with a loaded snapshot.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    /// Append a shape on top of everything else. Returns its index.
    pub fn append(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Overwrite the shape at `index`. Returns false if `index` is out of range.
    pub fn replace_at(&mut self, index: usize, shape: Shape) -> bool {
        let Some(slot) = self.shapes.get_mut(index) else {
            return false;
        };
        *slot = shape;
        true
    }

    /// Remove and return the shape at `index`, shifting later shapes down.
    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        if index < self.shapes.len() {
            Some(self.shapes.remove(index))
        } else {
            None
        }
    }

    /// Drop every selection marquee. Returns how many were removed.
    pub fn remove_marquees(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !s.is_marquee());
        before - self.shapes.len()
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Return a reference to the shape at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// All shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
