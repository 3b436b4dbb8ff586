//! The `<textarea>` overlay used to type a text shape.
//!
//! The overlay is positioned in page coordinates over the canvas point where
//! the text will land. Dropping a [`TextOverlay`] detaches its listeners and
//! removes the element.

use canvas::camera::Point;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlTextAreaElement, KeyboardEvent};

use crate::dom_input::{editor_css, page_position};

type EventCallback = Closure<dyn FnMut(web_sys::Event)>;
type KeyCallback = Closure<dyn FnMut(KeyboardEvent)>;

pub struct TextOverlay {
    textarea: HtmlTextAreaElement,
    on_blur: EventCallback,
    on_key: KeyCallback,
}

impl TextOverlay {
    /// Create the overlay over `screen` (canvas-relative CSS pixels) and focus it
    /// on the next tick, once the pointer event that opened it has finished.
    ///
    /// `on_blur` fires when the editor loses focus; `on_escape` when Escape is
    /// pressed inside it.
    ///
    /// # Errors
    ///
    /// Returns the DOM error if the element cannot be created or attached.
    pub fn open(
        canvas: &HtmlCanvasElement,
        screen: Point,
        color: &str,
        font_size: f64,
        on_blur: impl FnMut() + 'static,
        on_escape: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let textarea = document.create_element("textarea")?.dyn_into::<HtmlTextAreaElement>()?;
        let rect = canvas.get_bounding_client_rect();
        let page = page_position(rect.left(), rect.top(), window.scroll_x()?, window.scroll_y()?, screen);
        textarea.set_attribute("style", &editor_css(page, color, font_size))?;

        let mut on_blur = on_blur;
        let blur_cb: EventCallback =
            Closure::wrap(Box::new(move |_ev: web_sys::Event| on_blur()) as Box<dyn FnMut(web_sys::Event)>);
        let mut on_escape = on_escape;
        let key_cb: KeyCallback = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
            if ev.key() == "Escape" {
                ev.prevent_default();
                ev.stop_propagation();
                on_escape();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        textarea.add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref())?;
        textarea.add_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref())?;
        body.append_child(&textarea)?;

        let focus_target = textarea.clone();
        Timeout::new(0, move || {
            if let Err(e) = focus_target.focus() {
                log::debug!("text overlay focus failed: {e:?}");
            }
        })
        .forget();

        Ok(Self { textarea, on_blur: blur_cb, on_key: key_cb })
    }

    /// Current contents, untrimmed.
    pub fn value(&self) -> String {
        self.textarea.value()
    }

    /// Take the element off the page. Listeners stay attached until drop.
    pub fn hide(&self) {
        self.textarea.remove();
    }

    /// Drop the overlay on the next tick.
    ///
    /// Used from inside the overlay's own listeners, which must not free the
    /// closure that is currently running.
    pub fn dispose_later(self) {
        self.hide();
        Timeout::new(0, move || drop(self)).forget();
    }
}

impl Drop for TextOverlay {
    fn drop(&mut self) {
        if let Err(e) = self
            .textarea
            .remove_event_listener_with_callback("blur", self.on_blur.as_ref().unchecked_ref())
        {
            log::debug!("text overlay: detach blur failed: {e:?}");
        }
        if let Err(e) = self
            .textarea
            .remove_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref())
        {
            log::debug!("text overlay: detach keydown failed: {e:?}");
        }
        self.textarea.remove();
    }
}
