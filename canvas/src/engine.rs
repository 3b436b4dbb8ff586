//! Interaction engine: turns pointer, wheel and key input into shape edits.
//!
//! [`EngineCore`] holds everything that does not need a browser: the shape
//! store, camera, tool/selection state, the active gesture, and the ambient
//! style. Every handler returns a list of [`Action`]s for the host to carry
//! out (re-render, change the cursor, open or close the text overlay).
//!
//! [`Engine`] wraps the core together with the `<canvas>` element and its 2D
//! context.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::f64::consts::{PI, TAU};

use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::consts::{DEFAULT_TEXT_SIZE, ERASER_WIDTH, MAX_TEXT_SIZE, MIN_TEXT_SIZE, ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::doc::{
    BoxShape, CircleShape, EraserShape, LineShape, MarqueeShape, PencilShape, Shape, ShapeStore, StrokeStyle, TextShape,
};
use crate::hit::{self, Handle, TextMeasure};
use crate::input::{Button, Cursor, InputState, Key, Tool, UiState, WheelDelta};
use crate::render;
use crate::storage::{self, BlobStore};
use crate::style::{StyleChange, StyleContext};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene changed; call [`Engine::render`].
    RenderNeeded,
    /// Set the canvas element's CSS cursor.
    SetCursor(Cursor),
    /// Show an editable text region at a screen position.
    OpenTextEditor {
        /// Screen-space (CSS pixel) position relative to the canvas.
        screen: Point,
        color: String,
        /// Font size in CSS pixels at the current zoom.
        font_size: f64,
    },
    /// Remove the text region if one is open.
    CloseTextEditor,
}

/// Errors raised while binding the engine to a canvas.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("2d rendering context unavailable")]
    ContextUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

/// Build the shape a rubber-band drag from `start` to `end` produces with `tool`.
///
/// Returns `None` for tools that do not draw by dragging and for degenerate
/// drags (zero width or height, zero radius, or coincident endpoints).
#[must_use]
pub fn build_drag_shape(tool: Tool, start: Point, end: Point, style: &StyleContext, id: Uuid) -> Option<Shape> {
    let width = (end.x - start.x).abs();
    let height = (end.y - start.y).abs();
    match tool {
        Tool::Rect | Tool::Diamond => {
            if width == 0.0 || height == 0.0 {
                return None;
            }
            let b = BoxShape {
                id,
                x: start.x.min(end.x),
                y: start.y.min(end.y),
                width,
                height,
                rotation: 0.0,
                color: style.stroke_color.clone(),
                bg_color: style.bg_color.clone(),
                stroke_width: style.stroke_width,
                stroke_style: style.stroke_style,
            };
            Some(if tool == Tool::Rect { Shape::Rect(b) } else { Shape::Diamond(b) })
        }
        Tool::Circle => {
            let radius = width.hypot(height) / 2.0;
            if radius == 0.0 {
                return None;
            }
            Some(Shape::Circle(CircleShape {
                id,
                center_x: (start.x + end.x) / 2.0,
                center_y: (start.y + end.y) / 2.0,
                radius,
                rotation: 0.0,
                color: style.stroke_color.clone(),
                bg_color: style.bg_color.clone(),
                stroke_width: style.stroke_width,
                stroke_style: style.stroke_style,
            }))
        }
        Tool::Line | Tool::Arrow => {
            if start == end {
                return None;
            }
            let l = LineShape {
                id,
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
                rotation: 0.0,
                color: style.stroke_color.clone(),
                stroke_width: style.stroke_width,
                stroke_style: style.stroke_style,
            };
            Some(if tool == Tool::Line { Shape::Line(l) } else { Shape::Arrow(l) })
        }
        Tool::Select | Tool::Pencil | Tool::Eraser | Tool::Text => None,
    }
}

/// Build the stroke a pencil or eraser gesture produces.
///
/// Returns `None` for other tools and for paths with fewer than two points.
#[must_use]
pub fn build_freehand_shape(tool: Tool, path: Vec<Point>, style: &StyleContext, id: Uuid) -> Option<Shape> {
    if path.len() < 2 {
        return None;
    }
    match tool {
        Tool::Pencil => Some(Shape::Pencil(PencilShape {
            id,
            path,
            color: style.stroke_color.clone(),
            stroke_width: style.stroke_width,
            stroke_style: style.stroke_style,
        })),
        Tool::Eraser => Some(Shape::Eraser(EraserShape { id, path, stroke_width: ERASER_WIDTH })),
        _ => None,
    }
}

/// Normalize an angle difference into `(-PI, PI]`.
fn wrap_angle(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// The corner that stays put while dragging `handle`.
fn opposite_corner(handle: Handle) -> Option<Handle> {
    match handle {
        Handle::Tl => Some(Handle::Br),
        Handle::Tr => Some(Handle::Bl),
        Handle::Bl => Some(Handle::Tr),
        Handle::Br => Some(Handle::Tl),
        _ => None,
    }
}

/// Compute the reshaped shape for a resize gesture.
///
/// `original` is the shape at pointer-down and `cursor` the current world
/// position; the result is absolute, not incremental.
#[must_use]
pub fn resize_shape(original: &Shape, handle: Handle, anchor: Point, cursor: Point, measure: &dyn TextMeasure) -> Shape {
    let mut shape = original.clone();
    match &mut shape {
        Shape::Rect(b) | Shape::Diamond(b) => {
            if opposite_corner(handle).is_none() {
                return shape;
            }
            // Work in the box's unrotated frame with the anchor held fixed.
            let local = cursor.rotate_about(anchor, -b.rotation);
            let center = Point::new((anchor.x + local.x) / 2.0, (anchor.y + local.y) / 2.0)
                .rotate_about(anchor, b.rotation);
            b.width = (local.x - anchor.x).abs();
            b.height = (local.y - anchor.y).abs();
            b.x = center.x - b.width / 2.0;
            b.y = center.y - b.height / 2.0;
        }
        Shape::Circle(c) => {
            let center = Point::new(c.center_x, c.center_y);
            let local = cursor.rotate_about(center, -c.rotation);
            let radius = match handle {
                Handle::Left | Handle::Right => (local.x - center.x).abs(),
                Handle::Top | Handle::Bottom => (local.y - center.y).abs(),
                _ => c.radius,
            };
            // A zero radius can never be hit again; keep the pointer-down size.
            if radius > 0.0 {
                c.radius = radius;
            }
        }
        Shape::Line(l) | Shape::Arrow(l) => {
            let local = cursor.rotate_about(l.midpoint(), -l.rotation);
            match handle {
                // Coincident endpoints can never be hit again; keep the pointer-down segment.
                Handle::Start if local != l.end() => {
                    l.start_x = local.x;
                    l.start_y = local.y;
                }
                Handle::End if local != l.start() => {
                    l.end_x = local.x;
                    l.end_y = local.y;
                }
                _ => {}
            }
        }
        Shape::Text(t) => {
            if handle != Handle::Resize {
                return shape;
            }
            let local = cursor.rotate_about(Point::new(t.x, t.y), -t.rotation);
            let new_width = local.x - t.x;
            let old_width = measure.text_width(&t.text, t.size);
            if new_width > MIN_TEXT_SIZE && old_width > 0.0 {
                t.size = (t.size * new_width / old_width).clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE);
            }
        }
        Shape::Pencil(_) | Shape::Eraser(_) | Shape::Select(_) => {}
    }
    shape
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: ShapeStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub style: StyleContext,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    room_id: String,
    storage: Box<dyn BlobStore>,
    measure: Box<dyn TextMeasure>,
}

impl EngineCore {
    /// Create an engine for `room_id` and load the room's shapes from `storage`.
    ///
    /// Stale selection marquees left in the blob are dropped on load.
    #[must_use]
    pub fn new(room_id: &str, storage: Box<dyn BlobStore>, measure: Box<dyn TextMeasure>) -> Self {
        let mut doc = ShapeStore::new();
        doc.load_snapshot(storage::load_shapes(storage.as_ref(), room_id));
        let pruned = doc.remove_marquees();
        if pruned > 0 {
            log::debug!("room {room_id}: dropped {pruned} stale marquee(s)");
        }
        log::info!("room {room_id}: loaded {} shape(s)", doc.len());
        Self {
            doc,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            style: StyleContext::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            room_id: room_id.to_owned(),
            storage,
            measure,
        }
    }

    // --- Tool / style ---

    /// Switch the active tool.
    ///
    /// Leaving the text tool closes the overlay without committing. Leaving the
    /// select tool clears the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if tool != Tool::Text && matches!(self.input, InputState::EditingText { .. }) {
            self.input = InputState::Idle;
            actions.push(Action::CloseTextEditor);
        }
        if tool != Tool::Select {
            self.clear_selection();
        }
        if self.ui.tool != tool {
            log::debug!("tool: {} -> {}", self.ui.tool.as_str(), tool.as_str());
        }
        self.ui.tool = tool;
        self.ui.cursor = tool.cursor();
        actions.push(Action::SetCursor(self.ui.cursor));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn set_stroke_color(&mut self, color: &str) -> Vec<Action> {
        self.apply_style(&StyleChange::StrokeColor(color.to_owned()))
    }

    pub fn set_bg_color(&mut self, color: &str) -> Vec<Action> {
        self.apply_style(&StyleChange::BgColor(color.to_owned()))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Vec<Action> {
        self.apply_style(&StyleChange::StrokeWidth(width))
    }

    pub fn set_stroke_style(&mut self, style: StrokeStyle) -> Vec<Action> {
        self.apply_style(&StyleChange::StrokeStyle(style))
    }

    /// Record a style change for future shapes and push it onto the selection.
    pub fn apply_style(&mut self, change: &StyleChange) -> Vec<Action> {
        self.style.apply(change);
        let Some(index) = self.ui.selected else {
            return Vec::new();
        };
        let Some(mut shape) = self.doc.get(index).cloned() else {
            return Vec::new();
        };
        if change.apply_to(&mut shape) {
            log::debug!("restyle {} {}: {}", shape.type_name(), shape.id(), change.field_name());
            self.doc.replace_at(index, shape);
            self.persist();
        }
        vec![Action::RenderNeeded]
    }

    // --- Document commands ---

    /// Remove the selected shape. No-op without a selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(index) = self.ui.selected.take() else {
            return Vec::new();
        };
        if let Some(shape) = self.doc.remove_at(index) {
            log::debug!("delete {} {}", shape.type_name(), shape.id());
        }
        self.persist();
        vec![Action::RenderNeeded]
    }

    /// Remove every shape in the room.
    pub fn clear_all(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected = None;
        if !matches!(self.input, InputState::EditingText { .. }) {
            self.input = InputState::Idle;
        }
        log::info!("room {}: cleared", self.room_id);
        self.persist();
        vec![Action::RenderNeeded]
    }

    /// Commit the text overlay's content.
    ///
    /// Whitespace-only content cancels. Ignored when no text edit is open.
    pub fn commit_text(&mut self, content: &str) -> Vec<Action> {
        let InputState::EditingText { anchor } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        if !content.trim().is_empty() {
            let shape = Shape::Text(TextShape {
                id: Uuid::new_v4(),
                x: anchor.x,
                y: anchor.y,
                text: content.to_owned(),
                size: DEFAULT_TEXT_SIZE,
                rotation: 0.0,
                color: self.style.stroke_color.clone(),
                bg_color: self.style.bg_color.clone(),
                stroke_width: self.style.stroke_width,
                stroke_style: self.style.stroke_style,
            });
            log::debug!("commit text {}", shape.id());
            self.doc.append(shape);
            self.persist();
        }
        vec![Action::CloseTextEditor, Action::RenderNeeded]
    }

    /// Close the text overlay without committing.
    pub fn cancel_text(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::EditingText { .. }) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::CloseTextEditor]
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = match self.input {
            InputState::Idle => Vec::new(),
            InputState::EditingText { .. } => self.cancel_text(),
            // A pointer-up went missing; commit what we have.
            _ => self.on_pointer_up(screen_pt, Button::Primary),
        };

        let world = self.camera.screen_to_world(screen_pt);
        match self.ui.tool {
            Tool::Select => self.begin_select(world),
            Tool::Pencil | Tool::Eraser => {
                self.input = InputState::FreehandPath { path: vec![world], current: world };
            }
            Tool::Text => {
                self.input = InputState::EditingText { anchor: world };
                actions.push(Action::OpenTextEditor {
                    screen: self.camera.world_to_screen(world),
                    color: self.style.stroke_color.clone(),
                    font_size: DEFAULT_TEXT_SIZE * self.camera.zoom,
                });
            }
            Tool::Rect | Tool::Circle | Tool::Diamond | Tool::Line | Tool::Arrow => {
                self.input = InputState::DrawingShape { start: world, current: world };
            }
        }
        log::debug!("pointer down: {} -> {}", self.ui.tool.as_str(), self.input.name());
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        if matches!(self.input, InputState::Idle) {
            return self.update_hover_cursor(world);
        }
        match &mut self.input {
            InputState::Idle | InputState::EditingText { .. } => return Vec::new(),
            InputState::DrawingShape { current, .. } | InputState::MarqueeSelect { current, .. } => {
                *current = world;
            }
            InputState::FreehandPath { path, current } => {
                path.push(world);
                *current = world;
            }
            InputState::DraggingShape { index, last_world, .. } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                *last_world = world;
                let index = *index;
                if let Some(mut shape) = self.doc.get(index).cloned() {
                    shape.translate(dx, dy);
                    self.doc.replace_at(index, shape);
                }
            }
            InputState::ResizingShape { index, handle, anchor, original } => {
                let shape = resize_shape(original, *handle, *anchor, world, self.measure.as_ref());
                self.doc.replace_at(*index, shape);
            }
            InputState::RotatingShape { index, pivot, last_angle, .. } => {
                let angle = world.angle_from(*pivot);
                let delta = wrap_angle(angle - *last_angle);
                *last_angle = angle;
                let index = *index;
                if let Some(mut shape) = self.doc.get(index).cloned() {
                    shape.rotate_by(delta);
                    self.doc.replace_at(index, shape);
                }
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        let state = std::mem::take(&mut self.input);
        log::debug!("pointer up: {}", state.name());
        match state {
            InputState::Idle => return Vec::new(),
            InputState::EditingText { anchor } => {
                self.input = InputState::EditingText { anchor };
                return Vec::new();
            }
            InputState::DraggingShape { .. } | InputState::ResizingShape { .. } | InputState::RotatingShape { .. } => {
                self.persist();
            }
            InputState::DrawingShape { start, .. } => {
                match build_drag_shape(self.ui.tool, start, world, &self.style, Uuid::new_v4()) {
                    Some(shape) => {
                        log::debug!("create {} {}", shape.type_name(), shape.id());
                        self.doc.append(shape);
                        self.persist();
                    }
                    None => log::debug!("discard degenerate {}", self.ui.tool.as_str()),
                }
            }
            InputState::FreehandPath { path, .. } => {
                match build_freehand_shape(self.ui.tool, path, &self.style, Uuid::new_v4()) {
                    Some(shape) => {
                        log::debug!("create {} {}", shape.type_name(), shape.id());
                        self.doc.append(shape);
                        self.persist();
                    }
                    None => log::debug!("discard short {} stroke", self.ui.tool.as_str()),
                }
            }
            InputState::MarqueeSelect { start, .. } => self.finish_marquee(start, world),
        }
        vec![Action::RenderNeeded]
    }

    /// The browser took the pointer away (touch panning, capture loss).
    ///
    /// The open gesture is abandoned as if Escape were pressed. An open text
    /// editor and the selection are left alone.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Idle | InputState::EditingText { .. }) {
            return Vec::new();
        }
        log::debug!("pointer cancel: {}", self.input.name());
        self.cancel_gesture()
    }

    /// Zoom about the cursor. Any gesture may be in progress.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let factor = if delta.dy > 0.0 {
            ZOOM_OUT_STEP
        } else if delta.dy < 0.0 {
            ZOOM_IN_STEP
        } else {
            return Vec::new();
        };
        self.camera.zoom_at(screen_pt, factor);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            return self.cancel_gesture();
        }
        if key.is_delete() && matches!(self.input, InputState::Idle) {
            return self.delete_selected();
        }
        Vec::new()
    }

    // --- Queries ---

    /// Store index of the selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.ui.selected
    }

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.ui.selected.and_then(|i| self.doc.get(i))
    }

    /// All shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.doc.shapes()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    /// Text measurer shared with the renderer.
    #[must_use]
    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    // --- Internals ---

    fn begin_select(&mut self, world: Point) {
        let zoom = self.camera.zoom;
        if let Some(index) = self.ui.selected {
            let handle = self
                .doc
                .get(index)
                .and_then(|shape| hit::resolve_handle(world, shape, zoom, self.measure.as_ref()));
            if let Some(handle) = handle {
                self.begin_handle_gesture(index, handle, world);
                return;
            }
        }

        self.clear_selection();
        let Some(index) = hit::find_topmost_hit(world, self.doc.shapes(), self.measure.as_ref()).map(|(i, _)| i)
        else {
            self.input = InputState::MarqueeSelect { start: world, current: world };
            return;
        };
        self.ui.selected = Some(index);
        let handle = self
            .doc
            .get(index)
            .and_then(|shape| hit::resolve_handle(world, shape, zoom, self.measure.as_ref()));
        match handle {
            Some(handle) => self.begin_handle_gesture(index, handle, world),
            None => self.begin_drag(index, world),
        }
    }

    fn begin_drag(&mut self, index: usize, world: Point) {
        let Some(original) = self.doc.get(index).cloned() else {
            return;
        };
        self.input = InputState::DraggingShape { index, last_world: world, original };
    }

    fn begin_handle_gesture(&mut self, index: usize, handle: Handle, world: Point) {
        let Some(original) = self.doc.get(index).cloned() else {
            return;
        };
        if handle == Handle::Rotate {
            let pivot = original.pivot();
            self.input = InputState::RotatingShape { index, pivot, last_angle: world.angle_from(pivot), original };
            return;
        }
        let anchor = opposite_corner(handle)
            .and_then(|corner| {
                hit::handle_positions(&original, self.camera.zoom, self.measure.as_ref())
                    .into_iter()
                    .find(|(h, _)| *h == corner)
                    .map(|(_, p)| p)
            })
            .unwrap_or_else(|| original.pivot());
        log::debug!("resize {} via {}", original.type_name(), handle.as_str());
        self.input = InputState::ResizingShape { index, handle, anchor, original };
    }

    fn finish_marquee(&mut self, start: Point, end: Point) {
        let width = (end.x - start.x).abs();
        let height = (end.y - start.y).abs();
        if width == 0.0 || height == 0.0 {
            return;
        }
        self.doc.remove_marquees();
        let index = self.doc.append(Shape::Select(MarqueeShape {
            id: Uuid::new_v4(),
            x: start.x.min(end.x),
            y: start.y.min(end.y),
            width,
            height,
        }));
        self.ui.selected = Some(index);
        self.persist();
    }

    /// Drop the selection and any marquee record it left behind.
    fn clear_selection(&mut self) {
        self.ui.selected = None;
        if self.doc.remove_marquees() > 0 {
            self.persist();
        }
    }

    fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => {
                if self.ui.selected.is_none() {
                    return Vec::new();
                }
                self.clear_selection();
            }
            InputState::EditingText { .. } => return vec![Action::CloseTextEditor],
            InputState::DrawingShape { .. } | InputState::FreehandPath { .. } | InputState::MarqueeSelect { .. } => {}
            InputState::DraggingShape { index, original, .. }
            | InputState::ResizingShape { index, original, .. }
            | InputState::RotatingShape { index, original, .. } => {
                log::debug!("revert {} {}", original.type_name(), original.id());
                self.doc.replace_at(index, original);
            }
        }
        vec![Action::RenderNeeded]
    }

    fn update_hover_cursor(&mut self, world: Point) -> Vec<Action> {
        let cursor = match (self.ui.tool, self.selected_shape()) {
            (Tool::Select, Some(shape)) => {
                match hit::resolve_handle(world, shape, self.camera.zoom, self.measure.as_ref()) {
                    Some(handle) => Cursor::for_handle(handle),
                    None if !shape.is_marquee() && hit::point_in_shape(world, shape, self.measure.as_ref()) => {
                        Cursor::Move
                    }
                    None => Cursor::Default,
                }
            }
            (tool, _) => tool.cursor(),
        };
        if cursor == self.ui.cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor;
        vec![Action::SetCursor(cursor)]
    }

    fn persist(&self) {
        if let Err(e) = storage::save_shapes(self.storage.as_ref(), &self.room_id, self.doc.shapes()) {
            log::error!("room {}: save failed: {e}", self.room_id);
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Bind a new engine to `canvas` and load `room_id` from `storage`.
    ///
    /// # Errors
    ///
    /// Returns `ContextUnavailable` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, room_id: &str, storage: Box<dyn BlobStore>) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EngineError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable)?;
        let measure = Box::new(render::CanvasTextMeasure::new(ctx.clone()));
        let core = EngineCore::new(room_id, storage, measure);
        Ok(Self { canvas, ctx, core })
    }

    /// Update viewport dimensions and resize the canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * self.core.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * self.core.dpr).round().max(0.0) as u32);
    }

    /// Draw the current state to the canvas. A failed frame is logged and skipped.
    pub fn render(&self) {
        if let Err(e) = render::draw(&self.ctx, &self.core) {
            log::error!("render failed: {e:?}");
        }
    }

    /// The bound canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // --- Delegated inputs ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn apply_style(&mut self, change: &StyleChange) -> Vec<Action> {
        self.core.apply_style(change)
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.core.delete_selected()
    }

    pub fn clear_all(&mut self) -> Vec<Action> {
        self.core.clear_all()
    }

    pub fn commit_text(&mut self, content: &str) -> Vec<Action> {
        self.core.commit_text(content)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }
}
