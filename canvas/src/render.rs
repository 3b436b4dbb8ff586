//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of the engine and produces pixels; it does
//! not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use uuid::Uuid;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::consts::{
    ARROW_HEAD_LENGTH, BACKGROUND_COLOR, HANDLE_SIZE_PX, ROTATE_HANDLE_COLOR, SELECTION_COLOR, SELECTION_DASH_PX,
    TRANSPARENT,
};
use crate::doc::{BoxShape, CircleShape, LineShape, Shape, StrokeStyle, TextShape, path_bounds};
use crate::engine::{EngineCore, build_drag_shape, build_freehand_shape};
use crate::hit::{self, Handle, TextMeasure, font_spec};
use crate::input::InputState;

/// Arrowhead half-angle in radians (30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Text measurement backed by the live 2D context.
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasure {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        self.ctx.save();
        self.ctx.set_font(&font_spec(size));
        let width = match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => hit::ApproxTextMeasure.text_width(text, size),
        };
        self.ctx.restore();
        width
    }
}

/// Draw the full scene: background, shapes, gesture preview, selection UI.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = core.camera;

    // Layer 1: clear, paint the background in screen space, then enter world space.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: shapes in insertion order. Marquees belong to the selection layer.
    for shape in core.shapes() {
        if !shape.is_marquee() {
            draw_shape(ctx, shape, core.measure())?;
        }
    }

    // Layer 3: in-progress gesture.
    draw_preview(ctx, core)?;

    // Layer 4: selection UI.
    if let Some(shape) = core.selected_shape() {
        draw_selection(ctx, shape, camera, core.measure())?;
    }

    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, measure: &dyn TextMeasure) -> Result<(), JsValue> {
    match shape {
        Shape::Rect(b) => draw_rect(ctx, b),
        Shape::Diamond(b) => draw_diamond(ctx, b),
        Shape::Circle(c) => draw_circle(ctx, c),
        Shape::Line(l) => draw_line(ctx, l, false),
        Shape::Arrow(l) => draw_line(ctx, l, true),
        Shape::Pencil(p) => draw_path(ctx, &p.path, &p.color, p.stroke_width, p.stroke_style),
        Shape::Eraser(e) => draw_path(ctx, &e.path, BACKGROUND_COLOR, e.stroke_width, StrokeStyle::Solid),
        Shape::Text(t) => draw_text(ctx, t, measure),
        Shape::Select(m) => draw_dashed_box(ctx, m.x, m.y, m.width, m.height, 1.0),
    }
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_rect(ctx: &CanvasRenderingContext2d, b: &BoxShape) -> Result<(), JsValue> {
    ctx.save();
    rotate_about(ctx, Point::new(b.x + b.width / 2.0, b.y + b.height / 2.0), b.rotation)?;

    if has_fill(&b.bg_color) {
        ctx.set_fill_style_str(&b.bg_color);
        ctx.fill_rect(b.x, b.y, b.width, b.height);
    }
    apply_stroke_style(ctx, &b.color, b.stroke_width, b.stroke_style)?;
    ctx.stroke_rect(b.x, b.y, b.width, b.height);

    ctx.restore();
    Ok(())
}

fn draw_diamond(ctx: &CanvasRenderingContext2d, b: &BoxShape) -> Result<(), JsValue> {
    let cx = b.x + b.width / 2.0;
    let cy = b.y + b.height / 2.0;
    ctx.save();
    rotate_about(ctx, Point::new(cx, cy), b.rotation)?;

    ctx.begin_path();
    ctx.move_to(cx, b.y); // top
    ctx.line_to(b.x + b.width, cy); // right
    ctx.line_to(cx, b.y + b.height); // bottom
    ctx.line_to(b.x, cy); // left
    ctx.close_path();

    if has_fill(&b.bg_color) {
        ctx.set_fill_style_str(&b.bg_color);
        ctx.fill();
    }
    apply_stroke_style(ctx, &b.color, b.stroke_width, b.stroke_style)?;
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_circle(ctx: &CanvasRenderingContext2d, c: &CircleShape) -> Result<(), JsValue> {
    if c.radius <= 0.0 {
        return Ok(());
    }
    ctx.save();
    rotate_about(ctx, Point::new(c.center_x, c.center_y), c.rotation)?;

    ctx.begin_path();
    ctx.arc(c.center_x, c.center_y, c.radius, 0.0, 2.0 * PI)?;
    if has_fill(&c.bg_color) {
        ctx.set_fill_style_str(&c.bg_color);
        ctx.fill();
    }
    apply_stroke_style(ctx, &c.color, c.stroke_width, c.stroke_style)?;
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_line(ctx: &CanvasRenderingContext2d, l: &LineShape, arrowhead: bool) -> Result<(), JsValue> {
    ctx.save();
    rotate_about(ctx, l.midpoint(), l.rotation)?;
    apply_stroke_style(ctx, &l.color, l.stroke_width, l.stroke_style)?;

    ctx.begin_path();
    ctx.move_to(l.start_x, l.start_y);
    ctx.line_to(l.end_x, l.end_y);
    ctx.stroke();

    if arrowhead {
        // Heads are always solid so the tip stays legible.
        ctx.set_line_dash(&js_sys::Array::new())?;
        let angle = (l.end_y - l.start_y).atan2(l.end_x - l.start_x);
        draw_arrowhead(ctx, l.end(), angle);
    }

    ctx.restore();
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Point, angle: f64) {
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(
        tip.x - ARROW_HEAD_LENGTH * (angle - ARROW_ANGLE).cos(),
        tip.y - ARROW_HEAD_LENGTH * (angle - ARROW_ANGLE).sin(),
    );
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(
        tip.x - ARROW_HEAD_LENGTH * (angle + ARROW_ANGLE).cos(),
        tip.y - ARROW_HEAD_LENGTH * (angle + ARROW_ANGLE).sin(),
    );
    ctx.stroke();
}

fn draw_path(
    ctx: &CanvasRenderingContext2d,
    path: &[Point],
    color: &str,
    width: f64,
    style: StrokeStyle,
) -> Result<(), JsValue> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        return Ok(());
    }
    ctx.save();
    apply_stroke_style(ctx, color, width, style)?;
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, t: &TextShape, measure: &dyn TextMeasure) -> Result<(), JsValue> {
    ctx.save();
    rotate_about(ctx, Point::new(t.x, t.y), t.rotation)?;

    if has_fill(&t.bg_color) {
        let (x, y, w, h) = hit::text_box(t, measure);
        ctx.set_fill_style_str(&t.bg_color);
        ctx.fill_rect(x, y, w, h);
    }
    ctx.set_font(&font_spec(t.size));
    ctx.set_text_baseline("alphabetic");
    ctx.set_text_align("left");
    ctx.set_fill_style_str(&t.color);
    ctx.fill_text(&t.text, t.x, t.y)?;

    ctx.restore();
    Ok(())
}

// =============================================================
// Gesture preview
// =============================================================

fn draw_preview(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let zoom = core.camera.zoom;
    match &core.input {
        InputState::DrawingShape { start, current } => {
            match build_drag_shape(core.tool(), *start, *current, &core.style, Uuid::nil()) {
                Some(shape) => draw_shape(ctx, &shape, core.measure()),
                None => Ok(()),
            }
        }
        InputState::FreehandPath { path, current } => {
            let mut points = path.clone();
            if points.last() != Some(current) {
                points.push(*current);
            }
            match build_freehand_shape(core.tool(), points, &core.style, Uuid::nil()) {
                Some(shape) => draw_shape(ctx, &shape, core.measure()),
                None => Ok(()),
            }
        }
        InputState::MarqueeSelect { start, current } => {
            let x = start.x.min(current.x);
            let y = start.y.min(current.y);
            draw_dashed_box(ctx, x, y, (current.x - start.x).abs(), (current.y - start.y).abs(), zoom)
        }
        InputState::Idle
        | InputState::EditingText { .. }
        | InputState::DraggingShape { .. }
        | InputState::ResizingShape { .. }
        | InputState::RotatingShape { .. } => Ok(()),
    }
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    shape: &Shape,
    camera: Camera,
    measure: &dyn TextMeasure,
) -> Result<(), JsValue> {
    let zoom = camera.zoom;
    draw_selection_outline(ctx, shape, zoom, measure)?;

    let handles = hit::handle_positions(shape, zoom, measure);
    if handles.is_empty() {
        return Ok(());
    }
    let half = camera.screen_dist_to_world(HANDLE_SIZE_PX / 2.0);

    ctx.save();
    ctx.set_line_width(camera.screen_dist_to_world(1.0));
    ctx.set_stroke_style_str(SELECTION_COLOR);

    // Connector from the shape to the rotate knob.
    if let Some((_, knob)) = handles.iter().find(|(h, _)| *h == Handle::Rotate) {
        let base = rotate_connector_base(shape);
        ctx.begin_path();
        ctx.move_to(base.x, base.y);
        ctx.line_to(knob.x, knob.y);
        ctx.stroke();
    }

    for (handle, p) in &handles {
        if *handle == Handle::Rotate {
            ctx.begin_path();
            ctx.arc(p.x, p.y, half, 0.0, 2.0 * PI)?;
            ctx.set_fill_style_str(ROTATE_HANDLE_COLOR);
            ctx.fill();
            ctx.stroke();
        } else {
            ctx.set_fill_style_str("#fff");
            ctx.fill_rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
            ctx.stroke_rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
        }
    }

    ctx.restore();
    Ok(())
}

/// Dashed outline around the selected shape, rotated with it.
fn draw_selection_outline(
    ctx: &CanvasRenderingContext2d,
    shape: &Shape,
    zoom: f64,
    measure: &dyn TextMeasure,
) -> Result<(), JsValue> {
    let bounds = match shape {
        Shape::Rect(b) | Shape::Diamond(b) => Some((b.x, b.y, b.width, b.height)),
        Shape::Circle(c) => Some(c.bounds()),
        Shape::Text(t) => Some(hit::text_box(t, measure)),
        Shape::Select(m) => Some((m.x, m.y, m.width, m.height)),
        Shape::Pencil(p) => path_bounds(&p.path),
        Shape::Eraser(e) => path_bounds(&e.path),
        // Lines are marked by their endpoint handles alone.
        Shape::Line(_) | Shape::Arrow(_) => None,
    };
    let Some((x, y, w, h)) = bounds else {
        return Ok(());
    };
    ctx.save();
    rotate_about(ctx, shape.pivot(), shape.rotation())?;
    draw_dashed_box(ctx, x, y, w, h, zoom)?;
    ctx.restore();
    Ok(())
}

/// Point the rotate-knob connector starts from: the top edge midpoint for
/// boxes and circles, the segment midpoint for lines.
fn rotate_connector_base(shape: &Shape) -> Point {
    let local = match shape {
        Shape::Rect(b) | Shape::Diamond(b) => Point::new(b.x + b.width / 2.0, b.y),
        Shape::Circle(c) => Point::new(c.center_x, c.center_y - c.radius),
        _ => shape.pivot(),
    };
    local.rotate_about(shape.pivot(), shape.rotation())
}

fn draw_dashed_box(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, &[SELECTION_DASH_PX / zoom, SELECTION_DASH_PX / zoom])?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke_rect(x, y, w, h);
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Rotate the context by `angle` about `pivot`. No-op for zero rotation.
fn rotate_about(ctx: &CanvasRenderingContext2d, pivot: Point, angle: f64) -> Result<(), JsValue> {
    if angle == 0.0 {
        return Ok(());
    }
    ctx.translate(pivot.x, pivot.y)?;
    ctx.rotate(angle)?;
    ctx.translate(-pivot.x, -pivot.y)?;
    Ok(())
}

/// Apply stroke colour, width and dash pattern.
fn apply_stroke_style(
    ctx: &CanvasRenderingContext2d,
    color: &str,
    width: f64,
    style: StrokeStyle,
) -> Result<(), JsValue> {
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    set_dash(ctx, style.dash_pattern())
}

fn set_dash(ctx: &CanvasRenderingContext2d, segments: &[f64]) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    for seg in segments {
        dash_array.push(&(*seg).into());
    }
    ctx.set_line_dash(&dash_array)
}

fn has_fill(color: &str) -> bool {
    !color.is_empty() && color != TRANSPARENT
}
