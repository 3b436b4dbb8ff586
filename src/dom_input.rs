//! DOM event mapping and overlay layout helpers.
//!
//! Everything here is pure so it can be tested without a browser.

#[cfg(test)]
#[path = "dom_input_test.rs"]
mod dom_input_test;

use canvas::camera::Point;
use canvas::consts::{SELECTION_COLOR, TEXT_FONT_FAMILY};
use canvas::doc::StrokeStyle;
use canvas::input::Key;

/// Pointer position relative to the canvas, in CSS pixels.
#[must_use]
pub fn pointer_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

/// Keys whose browser default (history back, focus changes) must be suppressed
/// while the canvas has the keyboard.
#[must_use]
pub fn should_prevent_default_key(key: &str) -> bool {
    let key = Key(key.to_owned());
    key.is_delete() || key.is_escape()
}

/// Whether a key event target is a text entry element (`Element.tagName`).
#[must_use]
pub fn is_text_entry_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("textarea") || tag.eq_ignore_ascii_case("input")
}

/// Parse a stroke style name as used by toolbar widgets.
#[must_use]
pub fn parse_stroke_style(name: &str) -> Option<StrokeStyle> {
    match name {
        "solid" => Some(StrokeStyle::Solid),
        "dashed" => Some(StrokeStyle::Dashed),
        "dotted" => Some(StrokeStyle::Dotted),
        _ => None,
    }
}

/// Accept a toolbar stroke width if it is a positive finite number.
#[must_use]
pub fn checked_stroke_width(width: f64) -> Option<f64> {
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Console log level for the current build profile.
#[must_use]
pub fn log_level() -> log::Level {
    if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info }
}

/// Page position of a canvas-relative screen point.
#[must_use]
pub fn page_position(canvas_left: f64, canvas_top: f64, scroll_x: f64, scroll_y: f64, screen: Point) -> Point {
    Point::new(canvas_left + scroll_x + screen.x, canvas_top + scroll_y + screen.y)
}

/// Inline CSS for the text editor overlay centred on `page`.
#[must_use]
pub fn editor_css(page: Point, color: &str, font_size: f64) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;transform:translate(-50%,-50%);z-index:1000;\
         min-width:200px;min-height:40px;padding:4px;background:black;border:2px solid {SELECTION_COLOR};\
         outline:none;resize:none;color:{color};font-size:{font_size}px;font-family:{TEXT_FONT_FAMILY};\
         pointer-events:auto",
        page.x, page.y
    )
}
