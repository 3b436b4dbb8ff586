//! Browser glue: owns the engine, wires DOM listeners, and carries out the
//! [`Action`]s the engine returns.
//!
//! Every listener follows the same shape: borrow the engine, run one handler,
//! release the borrow, then apply the returned actions. Actions can re-enter
//! the host (closing the text overlay fires `blur`), so they never run while
//! the engine is borrowed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canvas::engine::{Action, Engine, EngineError};
use canvas::input::{Button, Cursor, Key, WheelDelta};
use canvas::storage::StorageError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, HtmlCanvasElement, KeyboardEvent, PointerEvent, WheelEvent};

use crate::dom_input::{is_text_entry_tag, pointer_point, should_prevent_default_key};
use crate::text_overlay::TextOverlay;

/// Errors raised while attaching the host to the page.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Shared state behind every listener and the JS-facing handle.
pub struct Host {
    canvas: HtmlCanvasElement,
    engine: RefCell<Engine>,
    overlay: RefCell<Option<TextOverlay>>,
    cursor: Cell<Cursor>,
    frame_pending: Cell<bool>,
    frame_cb: RefCell<Option<FrameCallback>>,
}

impl Host {
    pub fn new(engine: Engine) -> Rc<Self> {
        Rc::new(Self {
            canvas: engine.canvas().clone(),
            engine: RefCell::new(engine),
            overlay: RefCell::new(None),
            cursor: Cell::new(Cursor::Default),
            frame_pending: Cell::new(false),
            frame_cb: RefCell::new(None),
        })
    }
}

// =============================================================
// Engine access
// =============================================================

/// Run `f` against the engine and apply what it returns.
///
/// A re-entrant call (the engine is already borrowed further up the stack)
/// is dropped with a warning.
pub fn dispatch(host: &Rc<Host>, what: &str, f: impl FnOnce(&mut Engine) -> Vec<Action>) {
    let actions = match host.engine.try_borrow_mut() {
        Ok(mut engine) => f(&mut engine),
        Err(_) => {
            log::warn!("{what}: engine busy, input dropped");
            return;
        }
    };
    apply_actions(host, actions);
}

/// Carry out engine actions.
pub fn apply_actions(host: &Rc<Host>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => request_render(host),
            Action::SetCursor(cursor) => set_cursor(host, cursor),
            Action::OpenTextEditor { screen, color, font_size } => {
                close_editor(host);
                let on_blur = {
                    let host = Rc::downgrade(host);
                    move || {
                        if let Some(host) = host.upgrade() {
                            commit_editor(&host);
                        }
                    }
                };
                let on_escape = {
                    let host = Rc::downgrade(host);
                    move || {
                        if let Some(host) = host.upgrade() {
                            cancel_editor(&host);
                        }
                    }
                };
                match TextOverlay::open(&host.canvas, screen, &color, font_size, on_blur, on_escape) {
                    Ok(overlay) => *host.overlay.borrow_mut() = Some(overlay),
                    Err(e) => log::error!("text overlay: open failed: {e:?}"),
                }
            }
            Action::CloseTextEditor => close_editor(host),
        }
    }
}

fn set_cursor(host: &Host, cursor: Cursor) {
    if host.cursor.get() == cursor {
        return;
    }
    host.cursor.set(cursor);
    if let Err(e) = host.canvas.style().set_property("cursor", cursor.css()) {
        log::debug!("set cursor failed: {e:?}");
    }
}

// =============================================================
// Rendering
// =============================================================

/// Draw immediately.
pub fn render_now(host: &Host) {
    match host.engine.try_borrow() {
        Ok(engine) => engine.render(),
        Err(_) => log::warn!("render skipped: engine busy"),
    }
}

/// Coalesce render requests into one draw on the next animation frame.
fn request_render(host: &Rc<Host>) {
    if host.frame_pending.get() {
        return;
    }
    let Some(window) = web_sys::window() else {
        render_now(host);
        return;
    };
    host.frame_pending.set(true);

    let weak = Rc::downgrade(host);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        let Some(host) = weak.upgrade() else {
            return;
        };
        host.frame_pending.set(false);
        render_now(&host);
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        // The previous frame's closure has already run; replacing it frees it.
        *host.frame_cb.borrow_mut() = Some(cb);
    } else {
        host.frame_pending.set(false);
        render_now(host);
    }
}

// =============================================================
// Text overlay
// =============================================================

/// Commit whatever is typed in the open overlay.
///
/// Called on blur, and before a new pointer-down so that clicking elsewhere on
/// the canvas keeps the typed text.
pub fn commit_editor(host: &Rc<Host>) {
    let Some(overlay) = host.overlay.borrow_mut().take() else {
        return;
    };
    let content = overlay.value();
    overlay.dispose_later();
    dispatch(host, "commit text", |engine| engine.commit_text(&content));
}

fn cancel_editor(host: &Rc<Host>) {
    let Some(overlay) = host.overlay.borrow_mut().take() else {
        return;
    };
    overlay.dispose_later();
    dispatch(host, "cancel text", |engine| engine.on_key_down(&Key("Escape".into())));
}

fn close_editor(host: &Host) {
    let overlay = host.overlay.borrow_mut().take();
    drop(overlay);
}

// =============================================================
// Listeners
// =============================================================

/// Attach pointer, wheel, keyboard and resize listeners. They live as long as
/// the page. Touch panning is disabled on the canvas.
///
/// # Errors
///
/// Returns the DOM error if a listener cannot be attached.
pub fn attach_listeners(host: &Rc<Host>) -> Result<(), HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let document = window.document().ok_or(HostError::NoDocument)?;
    let canvas = host.canvas.clone();
    canvas.style().set_property("touch-action", "none")?;

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |ev: PointerEvent| {
            commit_editor(&host);
            if let Err(e) = host.canvas.set_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer capture failed: {e:?}");
            }
            let point = pointer_point(&ev);
            let button = Button::from_dom(ev.button());
            dispatch(&host, "pointerdown", |engine| engine.on_pointer_down(point, button));
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerdown", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |ev: PointerEvent| {
            let point = pointer_point(&ev);
            dispatch(&host, "pointermove", |engine| engine.on_pointer_move(point));
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |ev: PointerEvent| {
            if host.canvas.has_pointer_capture(ev.pointer_id()) {
                if let Err(e) = host.canvas.release_pointer_capture(ev.pointer_id()) {
                    log::debug!("pointer release failed: {e:?}");
                }
            }
            let point = pointer_point(&ev);
            let button = Button::from_dom(ev.button());
            dispatch(&host, "pointerup", |engine| engine.on_pointer_up(point, button));
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerup", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |_ev: PointerEvent| {
            dispatch(&host, "pointercancel", Engine::on_pointer_cancel);
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointercancel", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |ev: WheelEvent| {
            ev.prevent_default();
            let point = pointer_point(&ev);
            let delta = WheelDelta { dy: ev.delta_y() };
            dispatch(&host, "wheel", |engine| engine.on_wheel(point, delta));
        }) as Box<dyn FnMut(WheelEvent)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            cb.as_ref().unchecked_ref(),
            &options,
        )?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
            let typing = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .is_some_and(|el| is_text_entry_tag(&el.tag_name()));
            if typing {
                return;
            }
            let key = ev.key();
            if should_prevent_default_key(&key) {
                ev.prevent_default();
            }
            let key = Key(key);
            dispatch(&host, "keydown", |engine| engine.on_key_down(&key));
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    {
        let host = Rc::clone(host);
        let cb = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            fit_viewport(&host);
            render_now(&host);
        }) as Box<dyn FnMut(web_sys::Event)>);
        window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

/// Size the canvas backing store to its displayed size at the current pixel ratio.
pub fn fit_viewport(host: &Host) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let width = f64::from(host.canvas.client_width());
    let height = f64::from(host.canvas.client_height());
    match host.engine.try_borrow_mut() {
        Ok(mut engine) => engine.set_viewport(width, height, dpr),
        Err(_) => log::warn!("resize skipped: engine busy"),
    }
}
