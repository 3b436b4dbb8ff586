//! Browser host for the sketchroom drawing canvas.
//!
//! JavaScript calls [`initialize`] with a `<canvas>` element and a room id and
//! gets back a [`DrawingHandle`] for toolbar widgets. Everything else (pointer,
//! wheel and keyboard input, the text overlay, persistence to `localStorage`)
//! is wired up here and handed to the [`canvas`] engine.
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | Shared host state, listeners, action dispatch |
//! | [`text_overlay`] | `<textarea>` editor for text shapes |
//! | [`blob_store`] | `localStorage` blob store |
//! | [`dom_input`] | Pure DOM mapping and layout helpers |

pub mod blob_store;
pub mod dom_input;
pub mod host;
pub mod text_overlay;

use std::rc::Rc;
use std::sync::Once;

use canvas::engine::Engine;
use canvas::input::Tool;
use canvas::storage::{BlobStore, MemoryBlobStore};
use canvas::style::StyleChange;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::blob_store::LocalBlobStore;
use crate::dom_input::{checked_stroke_width, parse_stroke_style};
use crate::host::{Host, HostError, attach_listeners, dispatch, fit_viewport, render_now};

static INIT_LOGGING: Once = Once::new();

fn init_logging() {
    INIT_LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(dom_input::log_level()).is_ok() {
            log::debug!("console logging ready");
        }
    });
}

/// Bind a drawing surface to `canvas` for `room_id`.
///
/// Loads the room's saved shapes, sizes the canvas to its display size, draws
/// the first frame and starts listening for input.
///
/// # Errors
///
/// Fails without attaching anything if the canvas has no 2D context or the
/// listeners cannot be registered.
#[wasm_bindgen]
pub fn initialize(canvas: HtmlCanvasElement, room_id: &str) -> Result<DrawingHandle, JsValue> {
    init_logging();

    let storage: Box<dyn BlobStore> = match LocalBlobStore::from_window() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("room {room_id}: {e}; drawing will not be saved");
            Box::new(MemoryBlobStore::new())
        }
    };
    let engine = Engine::new(canvas, room_id, storage).map_err(HostError::from)?;
    let host = Host::new(engine);
    fit_viewport(&host);
    attach_listeners(&host)?;
    render_now(&host);
    log::info!("room {room_id}: canvas attached");
    Ok(DrawingHandle { host })
}

/// Toolbar-facing handle returned by [`initialize`].
#[wasm_bindgen]
pub struct DrawingHandle {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl DrawingHandle {
    /// Switch tools by name (`select`, `rect`, `circle`, `diamond`, `line`,
    /// `arrow`, `pencil`, `eraser`, `text`). Unknown names are logged and ignored.
    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&self, name: &str) {
        match name.parse::<Tool>() {
            Ok(tool) => dispatch(&self.host, "select tool", |engine| engine.set_tool(tool)),
            Err(e) => log::warn!("{e}"),
        }
    }

    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&self, color: &str) {
        self.restyle(StyleChange::StrokeColor(color.to_owned()));
    }

    #[wasm_bindgen(js_name = setBgColor)]
    pub fn set_bg_color(&self, color: &str) {
        self.restyle(StyleChange::BgColor(color.to_owned()));
    }

    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&self, width: f64) {
        match checked_stroke_width(width) {
            Some(width) => self.restyle(StyleChange::StrokeWidth(width)),
            None => log::warn!("ignoring stroke width {width}"),
        }
    }

    /// `solid`, `dashed` or `dotted`.
    #[wasm_bindgen(js_name = setStrokeStyle)]
    pub fn set_stroke_style(&self, name: &str) {
        match parse_stroke_style(name) {
            Some(style) => self.restyle(StyleChange::StrokeStyle(style)),
            None => log::warn!("unknown stroke style: {name}"),
        }
    }

    /// Remove the selected shape, if any.
    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&self) {
        dispatch(&self.host, "delete selected", Engine::delete_selected);
    }

    /// Remove every shape in the room.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) {
        dispatch(&self.host, "clear all", Engine::clear_all);
    }

    fn restyle(&self, change: StyleChange) {
        dispatch(&self.host, change.field_name(), |engine| engine.apply_style(&change));
    }
}
