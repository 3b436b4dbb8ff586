//! Geometry kernel: point-in-shape tests, handle layout and handle hit-testing.
//!
//! All functions here are pure. Coordinates are world space; handle sizes are
//! given in screen pixels and scaled by the caller's zoom so that handles keep
//! a constant on-screen size.
//!
//! Rotated shapes are tested by rotating the query point into the shape's
//! unrotated frame around [`Shape::pivot`] and testing the unrotated geometry.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_SIZE_PX, LINE_HIT_MARGIN, ROTATE_HANDLE_OFFSET_PX, TEXT_FONT_FAMILY};
use crate::doc::{BoxShape, LineShape, Shape, TextShape};

/// Measures rendered text width for a given font size.
///
/// The browser engine measures with the 2D context; tests and headless callers
/// use [`ApproxTextMeasure`].
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f64) -> f64;
}

/// Fixed-advance approximation: every character is `0.6 * size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * size * 0.6
    }
}

/// CSS font shorthand for a text shape of the given size.
#[must_use]
pub fn font_spec(size: f64) -> String {
    format!("{size}px {TEXT_FONT_FAMILY}")
}

/// A manipulation handle on the selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Top-left corner of a box.
    Tl,
    /// Top-right corner of a box.
    Tr,
    /// Bottom-left corner of a box.
    Bl,
    /// Bottom-right corner of a box.
    Br,
    /// Top of a circle.
    Top,
    /// Right of a circle.
    Right,
    /// Bottom of a circle.
    Bottom,
    /// Left of a circle.
    Left,
    /// Start point of a line or arrow.
    Start,
    /// End point of a line or arrow.
    End,
    /// Text size handle at the baseline's right end.
    Resize,
    /// Rotation knob.
    Rotate,
}

impl Handle {
    /// Short tag for logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tl => "tl",
            Self::Tr => "tr",
            Self::Bl => "bl",
            Self::Br => "br",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Start => "start",
            Self::End => "end",
            Self::Resize => "resize",
            Self::Rotate => "rotate",
        }
    }
}

// =============================================================
// Point-in-shape
// =============================================================

/// Whether `pt` lies on or inside `shape`.
#[must_use]
pub fn point_in_shape(pt: Point, shape: &Shape, measure: &dyn TextMeasure) -> bool {
    let local = to_local(pt, shape);
    match shape {
        Shape::Rect(b) => in_box(local, b.x, b.y, b.width, b.height),
        Shape::Select(m) => in_box(local, m.x, m.y, m.width, m.height),
        Shape::Diamond(b) => in_diamond(local, b),
        Shape::Circle(c) => {
            let dx = local.x - c.center_x;
            let dy = local.y - c.center_y;
            dx * dx + dy * dy <= c.radius * c.radius
        }
        Shape::Line(l) | Shape::Arrow(l) => on_line(local, l),
        Shape::Pencil(p) => near_path(local, &p.path, p.stroke_width + LINE_HIT_MARGIN),
        Shape::Eraser(e) => near_path(local, &e.path, e.stroke_width + LINE_HIT_MARGIN),
        Shape::Text(t) => {
            let (x, y, w, h) = text_box(t, measure);
            in_box(local, x, y, w, h)
        }
    }
}

/// Perpendicular distance from `pt` to segment `a`–`b`.
///
/// Returns `None` when the segment has zero length or the projection of `pt`
/// falls outside the segment.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> Option<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let projection = ((pt.x - a.x) * dx + (pt.y - a.y) * dy) / length;
    if projection < 0.0 || projection > length {
        return None;
    }
    Some(((pt.y - a.y) * dx - (pt.x - a.x) * dy).abs() / length)
}

/// Find the topmost drawable shape under `pt`.
///
/// Walks the shapes last-to-first. Eraser strokes and selection marquees are
/// never hit.
#[must_use]
pub fn find_topmost_hit<'a>(pt: Point, shapes: &'a [Shape], measure: &dyn TextMeasure) -> Option<(usize, &'a Shape)> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, s)| !matches!(s, Shape::Eraser(_) | Shape::Select(_)))
        .find(|(_, s)| point_in_shape(pt, s, measure))
}

/// Text glyph box as `(x, y, width, height)` in the text's unrotated frame.
#[must_use]
pub fn text_box(text: &TextShape, measure: &dyn TextMeasure) -> (f64, f64, f64, f64) {
    let width = measure.text_width(&text.text, text.size);
    (text.x, text.y - text.size, width, text.size)
}

fn to_local(pt: Point, shape: &Shape) -> Point {
    let rotation = shape.rotation();
    if rotation == 0.0 {
        pt
    } else {
        pt.rotate_about(shape.pivot(), -rotation)
    }
}

fn in_box(pt: Point, x: f64, y: f64, w: f64, h: f64) -> bool {
    pt.x >= x && pt.x <= x + w && pt.y >= y && pt.y <= y + h
}

fn in_diamond(pt: Point, b: &BoxShape) -> bool {
    let half_w = b.width / 2.0;
    let half_h = b.height / 2.0;
    if half_w == 0.0 || half_h == 0.0 {
        return false;
    }
    let dx = pt.x - (b.x + half_w);
    let dy = pt.y - (b.y + half_h);
    (dx / half_w).abs() + (dy / half_h).abs() <= 1.0
}

fn on_line(pt: Point, l: &LineShape) -> bool {
    distance_to_segment(pt, l.start(), l.end()).is_some_and(|d| d <= l.stroke_width + LINE_HIT_MARGIN)
}

fn near_path(pt: Point, path: &[Point], slop: f64) -> bool {
    path.windows(2)
        .any(|seg| distance_to_segment(pt, seg[0], seg[1]).is_some_and(|d| d <= slop))
}

// =============================================================
// Handles
// =============================================================

/// World-space positions of every handle on `shape` at the given zoom.
///
/// Positions follow the shape's rotation. Pencil, eraser and marquee shapes
/// have no handles.
#[must_use]
pub fn handle_positions(shape: &Shape, zoom: f64, measure: &dyn TextMeasure) -> Vec<(Handle, Point)> {
    let offset = ROTATE_HANDLE_OFFSET_PX / zoom;
    let local = match shape {
        Shape::Rect(b) | Shape::Diamond(b) => vec![
            (Handle::Tl, Point::new(b.x, b.y)),
            (Handle::Tr, Point::new(b.x + b.width, b.y)),
            (Handle::Bl, Point::new(b.x, b.y + b.height)),
            (Handle::Br, Point::new(b.x + b.width, b.y + b.height)),
            (Handle::Rotate, Point::new(b.x + b.width / 2.0, b.y - offset)),
        ],
        Shape::Circle(c) => vec![
            (Handle::Top, Point::new(c.center_x, c.center_y - c.radius)),
            (Handle::Right, Point::new(c.center_x + c.radius, c.center_y)),
            (Handle::Bottom, Point::new(c.center_x, c.center_y + c.radius)),
            (Handle::Left, Point::new(c.center_x - c.radius, c.center_y)),
            (Handle::Rotate, Point::new(c.center_x, c.center_y - c.radius - offset)),
        ],
        Shape::Line(l) | Shape::Arrow(l) => {
            let mut handles = vec![(Handle::Start, l.start()), (Handle::End, l.end())];
            if let Some(knob) = line_rotate_knob(l, offset) {
                handles.push((Handle::Rotate, knob));
            }
            handles
        }
        Shape::Text(t) => {
            let width = measure.text_width(&t.text, t.size);
            vec![(Handle::Resize, Point::new(t.x + width, t.y))]
        }
        Shape::Pencil(_) | Shape::Eraser(_) | Shape::Select(_) => Vec::new(),
    };

    let rotation = shape.rotation();
    if rotation == 0.0 {
        return local;
    }
    let pivot = shape.pivot();
    local
        .into_iter()
        .map(|(h, p)| (h, p.rotate_about(pivot, rotation)))
        .collect()
}

/// Rotate knob for a line: perpendicular to the segment at its midpoint.
fn line_rotate_knob(l: &LineShape, offset: f64) -> Option<Point> {
    let dx = l.end_x - l.start_x;
    let dy = l.end_y - l.start_y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let mid = l.midpoint();
    Some(Point::new(mid.x - dy / length * offset, mid.y + dx / length * offset))
}

/// Which handle of `shape`, if any, lies under `pt`.
///
/// Each handle owns a square hit zone `HANDLE_SIZE_PX` wide on screen.
/// When zones overlap the first handle in layout order wins.
#[must_use]
pub fn resolve_handle(pt: Point, shape: &Shape, zoom: f64, measure: &dyn TextMeasure) -> Option<Handle> {
    let half = HANDLE_SIZE_PX / 2.0 / zoom;
    handle_positions(shape, zoom, measure)
        .into_iter()
        .find(|(_, p)| (pt.x - p.x).abs() <= half && (pt.y - p.y).abs() <= half)
        .map(|(h, _)| h)
}
