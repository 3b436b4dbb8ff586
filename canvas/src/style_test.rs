#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::camera::Point;
use crate::doc::{BoxShape, EraserShape, LineShape};

fn rect() -> Shape {
    Shape::Rect(BoxShape {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        rotation: 0.0,
        color: "#FFFFFF".to_owned(),
        bg_color: "transparent".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    })
}

fn line() -> Shape {
    Shape::Line(LineShape {
        id: Uuid::new_v4(),
        start_x: 0.0,
        start_y: 0.0,
        end_x: 10.0,
        end_y: 0.0,
        rotation: 0.0,
        color: "#FFFFFF".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    })
}

#[test]
fn default_style() {
    let style = StyleContext::default();
    assert_eq!(style.stroke_color, "#FFFFFF");
    assert_eq!(style.bg_color, "transparent");
    assert_eq!(style.stroke_width, 2.0);
    assert_eq!(style.stroke_style, StrokeStyle::Solid);
}

#[test]
fn apply_updates_each_field() {
    let mut style = StyleContext::default();
    style.apply(&StyleChange::StrokeColor("#FF0000".to_owned()));
    style.apply(&StyleChange::BgColor("#00FF00".to_owned()));
    style.apply(&StyleChange::StrokeWidth(6.0));
    style.apply(&StyleChange::StrokeStyle(StrokeStyle::Dotted));
    assert_eq!(style.stroke_color, "#FF0000");
    assert_eq!(style.bg_color, "#00FF00");
    assert_eq!(style.stroke_width, 6.0);
    assert_eq!(style.stroke_style, StrokeStyle::Dotted);
}

#[test]
fn apply_to_rect_sets_fill() {
    let mut shape = rect();
    assert!(StyleChange::BgColor("#123456".to_owned()).apply_to(&mut shape));
    let Shape::Rect(b) = &shape else { unreachable!() };
    assert_eq!(b.bg_color, "#123456");
}

#[test]
fn apply_to_line_ignores_fill() {
    let mut shape = line();
    let before = shape.clone();
    assert!(!StyleChange::BgColor("#123456".to_owned()).apply_to(&mut shape));
    assert_eq!(shape, before);
}

#[test]
fn apply_to_line_sets_width_and_dash() {
    let mut shape = line();
    assert!(StyleChange::StrokeWidth(8.0).apply_to(&mut shape));
    assert!(StyleChange::StrokeStyle(StrokeStyle::Dashed).apply_to(&mut shape));
    let Shape::Line(l) = &shape else { unreachable!() };
    assert_eq!(l.stroke_width, 8.0);
    assert_eq!(l.stroke_style, StrokeStyle::Dashed);
}

#[test]
fn eraser_accepts_only_width() {
    let mut shape = Shape::Eraser(EraserShape {
        id: Uuid::new_v4(),
        path: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        stroke_width: 10.0,
    });
    assert!(!StyleChange::StrokeColor("#FF0000".to_owned()).apply_to(&mut shape));
    assert!(StyleChange::StrokeWidth(4.0).apply_to(&mut shape));
}

#[test]
fn field_names() {
    assert_eq!(StyleChange::StrokeWidth(1.0).field_name(), "stroke_width");
    assert_eq!(StyleChange::BgColor(String::new()).field_name(), "bg_color");
}
