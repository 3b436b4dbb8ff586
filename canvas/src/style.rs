//! Ambient drawing style applied to new shapes and pushed onto the selection.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use crate::consts::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, TRANSPARENT};
use crate::doc::{Shape, StrokeStyle};

/// Current stroke colour, fill colour, stroke width and dash style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContext {
    pub stroke_color: String,
    pub bg_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            bg_color: TRANSPARENT.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_style: StrokeStyle::Solid,
        }
    }
}

/// A single style edit coming from the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    StrokeColor(String),
    BgColor(String),
    StrokeWidth(f64),
    StrokeStyle(StrokeStyle),
}

impl StyleContext {
    /// Record `change` as the style for future shapes.
    pub fn apply(&mut self, change: &StyleChange) {
        match change {
            StyleChange::StrokeColor(c) => c.clone_into(&mut self.stroke_color),
            StyleChange::BgColor(c) => c.clone_into(&mut self.bg_color),
            StyleChange::StrokeWidth(w) => self.stroke_width = *w,
            StyleChange::StrokeStyle(s) => self.stroke_style = *s,
        }
    }
}

impl StyleChange {
    /// Apply this change to an existing shape.
    ///
    /// Returns `false` when the shape has no matching field (for example a
    /// fill colour on a line), leaving the shape untouched.
    pub fn apply_to(&self, shape: &mut Shape) -> bool {
        match self {
            Self::StrokeColor(c) => shape.set_stroke_color(c),
            Self::BgColor(c) => shape.set_bg_color(c),
            Self::StrokeWidth(w) => shape.set_stroke_width(*w),
            Self::StrokeStyle(s) => shape.set_stroke_style(*s),
        }
    }

    /// Short tag for logging.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::StrokeColor(_) => "stroke_color",
            Self::BgColor(_) => "bg_color",
            Self::StrokeWidth(_) => "stroke_width",
            Self::StrokeStyle(_) => "stroke_style",
        }
    }
}
