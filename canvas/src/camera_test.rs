#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_rotate_quarter_turn_about_origin() {
    let p = Point::new(1.0, 0.0).rotate_about(Point::new(0.0, 0.0), FRAC_PI_2);
    assert!(point_approx_eq(p, Point::new(0.0, 1.0)));
}

#[test]
fn point_rotate_about_pivot() {
    let p = Point::new(20.0, 10.0).rotate_about(Point::new(10.0, 10.0), PI);
    assert!(point_approx_eq(p, Point::new(0.0, 10.0)));
}

#[test]
fn point_rotate_zero_is_identity() {
    let p = Point::new(7.5, -2.0);
    assert_eq!(p.rotate_about(Point::new(100.0, 100.0), 0.0), p);
}

#[test]
fn point_angle_from_origin() {
    assert!(approx_eq(Point::new(0.0, 5.0).angle_from(Point::new(0.0, 0.0)), FRAC_PI_2));
    assert!(approx_eq(Point::new(5.0, 0.0).angle_from(Point::new(0.0, 0.0)), 0.0));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

// --- Conversions ---

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let p = cam.screen_to_world(Point::new(42.0, 17.0));
    assert!(point_approx_eq(p, Point::new(42.0, 17.0)));
}

#[test]
fn screen_to_world_applies_offset_then_scale() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let p = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(p, Point::new(100.0, 100.0)));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
    let cam = Camera { pan_x: -30.0, pan_y: 12.5, zoom: 0.75 };
    let screen = Point::new(123.0, 456.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!(point_approx_eq(back, screen));
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_world(12.0), 3.0));
}

// --- Zoom ---

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut cam = Camera::default();
    let anchor = Point::new(50.0, 50.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.1);
    let after = cam.world_to_screen(before);
    assert!(point_approx_eq(after, anchor));
    assert!(approx_eq(cam.zoom, 1.1));
}

#[test]
fn zoom_at_keeps_anchor_fixed_with_existing_pan() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -25.0, zoom: 2.5 };
    let anchor = Point::new(310.0, 90.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 0.9);
    assert!(point_approx_eq(cam.world_to_screen(before), anchor));
}

#[test]
fn zoom_clamps_to_max() {
    let mut cam = Camera::default();
    for _ in 0..100 {
        cam.zoom_at(Point::new(0.0, 0.0), 1.1);
    }
    assert_eq!(cam.zoom, MAX_ZOOM);
}

#[test]
fn zoom_clamps_to_min() {
    let mut cam = Camera::default();
    for _ in 0..100 {
        cam.zoom_at(Point::new(10.0, 10.0), 0.9);
    }
    assert_eq!(cam.zoom, MIN_ZOOM);
}
