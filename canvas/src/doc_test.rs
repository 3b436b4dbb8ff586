#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_2;

use serde_json::json;
use uuid::Uuid;

use super::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::Rect(BoxShape {
        id: Uuid::new_v4(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        color: "#FFFFFF".to_owned(),
        bg_color: "transparent".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    })
}

fn line(ax: f64, ay: f64, bx: f64, by: f64) -> Shape {
    Shape::Line(LineShape {
        id: Uuid::new_v4(),
        start_x: ax,
        start_y: ay,
        end_x: bx,
        end_y: by,
        rotation: 0.0,
        color: "#FFFFFF".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    })
}

fn eraser() -> Shape {
    Shape::Eraser(EraserShape {
        id: Uuid::new_v4(),
        path: vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)],
        stroke_width: 10.0,
    })
}

// =============================================================
// Serde layout
// =============================================================

#[test]
fn rect_serializes_with_type_tag_and_camel_case() {
    let shape = rect(10.0, 10.0, 100.0, 50.0);
    let value = serde_json::to_value(&shape).unwrap();
    assert_eq!(value["type"], "rect");
    assert_eq!(value["bgColor"], "transparent");
    assert_eq!(value["strokeWidth"], 2.0);
    assert_eq!(value["strokeStyle"], "solid");
    assert!(value.get("rotation").is_none());
}

#[test]
fn rotation_is_serialized_when_nonzero() {
    let mut shape = rect(0.0, 0.0, 10.0, 10.0);
    shape.rotate_by(0.5);
    let value = serde_json::to_value(&shape).unwrap();
    assert_eq!(value["rotation"], 0.5);
}

#[test]
fn missing_rotation_and_stroke_style_default() {
    let raw = json!({
        "type": "diamond",
        "id": Uuid::new_v4(),
        "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0,
        "color": "#fff", "bgColor": "transparent", "strokeWidth": 1.0
    });
    let shape: Shape = serde_json::from_value(raw).unwrap();
    assert_eq!(shape.rotation(), 0.0);
    let Shape::Diamond(d) = shape else {
        panic!("expected diamond");
    };
    assert_eq!(d.stroke_style, StrokeStyle::Solid);
}

#[test]
fn legacy_circle_cache_fields_are_ignored() {
    let raw = json!({
        "type": "circle",
        "id": Uuid::new_v4(),
        "x": 0.0, "y": 0.0, "endX": 20.0, "endY": 20.0, "width": 20.0, "height": 20.0,
        "centerX": 10.0, "centerY": 10.0, "radius": 14.14,
        "color": "#fff", "bgColor": "transparent", "strokeWidth": 2.0, "strokeStyle": "solid"
    });
    let shape: Shape = serde_json::from_value(raw).unwrap();
    let Shape::Circle(c) = &shape else {
        panic!("expected circle");
    };
    assert_eq!(c.center_x, 10.0);
    assert_eq!(c.radius, 14.14);
    let back = serde_json::to_value(&shape).unwrap();
    assert!(back.get("endX").is_none());
    assert!(back.get("width").is_none());
}

#[test]
fn pencil_path_serializes_as_xy_objects() {
    let shape = Shape::Pencil(PencilShape {
        id: Uuid::new_v4(),
        path: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        color: "#fff".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Dotted,
    });
    let value = serde_json::to_value(&shape).unwrap();
    assert_eq!(value["path"], json!([{ "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 }]));
    assert_eq!(value["strokeStyle"], "dotted");
}

#[test]
fn every_variant_has_matching_type_name() {
    let shapes = [
        rect(0.0, 0.0, 1.0, 1.0),
        line(0.0, 0.0, 1.0, 1.0),
        eraser(),
        Shape::Select(MarqueeShape { id: Uuid::new_v4(), x: 0.0, y: 0.0, width: 1.0, height: 1.0 }),
    ];
    for shape in shapes {
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["type"], shape.type_name());
    }
}

#[test]
fn stroke_style_dash_patterns() {
    assert!(StrokeStyle::Solid.dash_pattern().is_empty());
    assert_eq!(StrokeStyle::Dashed.dash_pattern(), &[5.0, 5.0]);
    assert_eq!(StrokeStyle::Dotted.dash_pattern(), &[2.0, 2.0]);
}

// =============================================================
// Shape geometry helpers
// =============================================================

#[test]
fn translate_moves_rect_origin_only() {
    let mut shape = rect(10.0, 10.0, 100.0, 50.0);
    shape.translate(20.0, 5.0);
    let Shape::Rect(r) = shape else {
        panic!("expected rect");
    };
    assert_eq!((r.x, r.y, r.width, r.height), (30.0, 15.0, 100.0, 50.0));
}

#[test]
fn translate_moves_both_line_endpoints() {
    let mut shape = line(0.0, 0.0, 10.0, 0.0);
    shape.translate(-1.0, 2.0);
    let Shape::Line(l) = shape else {
        panic!("expected line");
    };
    assert_eq!((l.start_x, l.start_y, l.end_x, l.end_y), (-1.0, 2.0, 9.0, 2.0));
}

#[test]
fn translate_moves_every_path_point() {
    let mut shape = eraser();
    shape.translate(1.0, 1.0);
    let Shape::Eraser(e) = shape else {
        panic!("expected eraser");
    };
    assert_eq!(e.path, vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)]);
}

#[test]
fn rotate_line_rotates_endpoints_about_midpoint() {
    let mut shape = line(0.0, 0.0, 10.0, 0.0);
    shape.rotate_by(FRAC_PI_2);
    let Shape::Line(l) = shape else {
        panic!("expected line");
    };
    assert!((l.start_x - 5.0).abs() < 1e-9);
    assert!((l.start_y + 5.0).abs() < 1e-9);
    assert!((l.end_x - 5.0).abs() < 1e-9);
    assert!((l.end_y - 5.0).abs() < 1e-9);
    assert_eq!(l.rotation, 0.0);
}

#[test]
fn path_bounds_spans_every_point() {
    let path = [Point::new(5.0, 10.0), Point::new(-5.0, 30.0), Point::new(15.0, 20.0)];
    assert_eq!(path_bounds(&path), Some((-5.0, 10.0, 20.0, 20.0)));
    assert_eq!(path_bounds(&[]), None);
}

#[test]
fn freehand_pivot_is_bounds_center() {
    let shape = Shape::Eraser(EraserShape {
        id: Uuid::new_v4(),
        path: vec![Point::new(0.0, 0.0), Point::new(40.0, 10.0), Point::new(20.0, 30.0)],
        stroke_width: 10.0,
    });
    assert_eq!(shape.pivot(), Point::new(20.0, 15.0));
}

#[test]
fn rotate_rect_accumulates() {
    let mut shape = rect(0.0, 0.0, 10.0, 10.0);
    shape.rotate_by(0.25);
    shape.rotate_by(0.5);
    assert!((shape.rotation() - 0.75).abs() < 1e-12);
}

#[test]
fn pivot_of_text_is_anchor() {
    let shape = Shape::Text(TextShape {
        id: Uuid::new_v4(),
        x: 5.0,
        y: 40.0,
        text: "hi".to_owned(),
        size: 16.0,
        rotation: 0.0,
        color: "#fff".to_owned(),
        bg_color: "transparent".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    });
    assert_eq!(shape.pivot(), Point::new(5.0, 40.0));
}

#[test]
fn circle_bounds_are_derived() {
    let c = CircleShape {
        id: Uuid::new_v4(),
        center_x: 50.0,
        center_y: 40.0,
        radius: 10.0,
        rotation: 0.0,
        color: "#fff".to_owned(),
        bg_color: "transparent".to_owned(),
        stroke_width: 2.0,
        stroke_style: StrokeStyle::Solid,
    };
    assert_eq!(c.bounds(), (40.0, 30.0, 20.0, 20.0));
}

#[test]
fn style_setters_report_unsupported_fields() {
    let mut l = line(0.0, 0.0, 1.0, 1.0);
    assert!(l.set_stroke_color("#f00"));
    assert!(!l.set_bg_color("#0f0"));
    assert!(l.set_stroke_width(4.0));

    let mut e = eraser();
    assert!(!e.set_stroke_color("#f00"));
    assert!(!e.set_stroke_style(StrokeStyle::Dashed));

    let mut r = rect(0.0, 0.0, 1.0, 1.0);
    assert!(r.set_bg_color("#0f0"));
    let Shape::Rect(b) = r else {
        panic!("expected rect");
    };
    assert_eq!(b.bg_color, "#0f0");
}

// =============================================================
// ShapeStore
// =============================================================

#[test]
fn store_new_is_empty() {
    let store = ShapeStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn store_append_preserves_order() {
    let mut store = ShapeStore::new();
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = line(0.0, 0.0, 1.0, 1.0);
    assert_eq!(store.append(a.clone()), 0);
    assert_eq!(store.append(b.clone()), 1);
    assert_eq!(store.shapes(), &[a, b]);
}

#[test]
fn store_replace_at_overwrites() {
    let mut store = ShapeStore::new();
    store.append(rect(0.0, 0.0, 1.0, 1.0));
    let replacement = line(1.0, 1.0, 2.0, 2.0);
    assert!(store.replace_at(0, replacement.clone()));
    assert_eq!(store.get(0), Some(&replacement));
}

#[test]
fn store_replace_at_out_of_range_is_noop() {
    let mut store = ShapeStore::new();
    assert!(!store.replace_at(3, rect(0.0, 0.0, 1.0, 1.0)));
    assert!(store.is_empty());
}

#[test]
fn store_remove_at_shifts_later_shapes() {
    let mut store = ShapeStore::new();
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(5.0, 5.0, 1.0, 1.0);
    store.append(a.clone());
    store.append(b.clone());
    assert_eq!(store.remove_at(0), Some(a));
    assert_eq!(store.get(0), Some(&b));
    assert_eq!(store.remove_at(7), None);
}

#[test]
fn store_remove_marquees_keeps_drawables() {
    let mut store = ShapeStore::new();
    store.append(rect(0.0, 0.0, 1.0, 1.0));
    store.append(Shape::Select(MarqueeShape { id: Uuid::new_v4(), x: 0.0, y: 0.0, width: 5.0, height: 5.0 }));
    store.append(eraser());
    assert_eq!(store.remove_marquees(), 1);
    assert_eq!(store.len(), 2);
    assert!(store.shapes().iter().all(|s| !s.is_marquee()));
}

#[test]
fn store_load_snapshot_replaces_existing() {
    let mut store = ShapeStore::new();
    store.append(rect(0.0, 0.0, 1.0, 1.0));
    let snapshot = vec![line(0.0, 0.0, 1.0, 1.0), eraser()];
    store.load_snapshot(snapshot.clone());
    assert_eq!(store.shapes(), snapshot.as_slice());
    store.clear();
    assert!(store.is_empty());
}
