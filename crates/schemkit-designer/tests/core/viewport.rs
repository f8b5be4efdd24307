use schemkit_core::{Bounds, Point};
use schemkit_designer::svg::ViewBox;
use schemkit_designer::viewport::{snapped_canvas_position, Viewport};

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{} != {}",
        a,
        b
    );
}

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new(1200.0, 800.0);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan_x(), 0.0);
    assert_eq!(vp.pan_y(), 0.0);
    assert_eq!(vp.to_string(), "Zoom: 1.00x | Pan: (0.0, 0.0)");
}

#[test]
fn test_identity_mapping_is_y_down() {
    let vp = Viewport::default();
    assert_close(vp.screen_to_canvas(Point::new(103.0, 58.0)), Point::new(103.0, 58.0));

    let below = vp.screen_to_canvas(Point::new(0.0, 100.0));
    assert!(below.y > 0.0);
}

#[test]
fn test_client_origin_is_subtracted() {
    let mut vp = Viewport::new(1200.0, 800.0);
    vp.set_client_origin(Point::new(50.0, 30.0));

    let p = snapped_canvas_position(Point::new(153.0, 88.0), &vp, 20.0);
    assert_eq!(p, Point::new(100.0, 60.0));
}

#[test]
fn test_zoom_and_pan_round_trip() {
    let mut vp = Viewport::new(1200.0, 800.0);
    vp.set_zoom(2.0);
    vp.set_pan(10.0, 20.0);

    let canvas = vp.screen_to_canvas(Point::new(210.0, 220.0));
    assert_close(canvas, Point::new(100.0, 100.0));
    assert_close(vp.canvas_to_screen(canvas), Point::new(210.0, 220.0));
}

#[test]
fn test_zoom_is_clamped() {
    let mut vp = Viewport::default();
    vp.set_zoom(100.0);
    assert_eq!(vp.zoom(), 50.0);
    vp.set_zoom(0.01);
    assert_eq!(vp.zoom(), 0.1);

    vp.reset();
    vp.zoom_in();
    assert!((vp.zoom() - 1.2).abs() < 1e-12);
    vp.zoom_out();
    assert!((vp.zoom() - 1.0).abs() < 1e-12);
}

#[test]
fn test_zoom_to_point_keeps_point_fixed() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_client_origin(Point::new(5.0, 5.0));
    vp.set_pan(12.0, -7.0);

    let anchor = Point::new(100.0, 50.0);
    let before = vp.canvas_to_screen(anchor);
    vp.zoom_to_point(anchor, 3.0);
    assert_eq!(vp.zoom(), 3.0);
    assert_close(vp.canvas_to_screen(anchor), before);

    vp.zoom_out_at(anchor);
    assert_close(vp.canvas_to_screen(anchor), before);
}

#[test]
fn test_from_view_box_scales_to_client_rect() {
    let view_box = ViewBox::parse("0 0 1200 800").unwrap();
    let vp = Viewport::from_view_box(&view_box, Bounds::new(100.0, 50.0, 700.0, 450.0));
    assert_eq!(vp.zoom(), 0.5);
    assert_close(vp.screen_to_canvas(Point::new(100.0, 50.0)), Point::origin());
    assert_close(
        vp.screen_to_canvas(Point::new(700.0, 450.0)),
        Point::new(1200.0, 800.0),
    );
}

#[test]
fn test_from_view_box_letterboxes() {
    let view_box = ViewBox::parse("0 0 100 100").unwrap();
    let vp = Viewport::from_view_box(&view_box, Bounds::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(vp.zoom(), 1.0);
    assert_close(vp.screen_to_canvas(Point::new(50.0, 0.0)), Point::origin());
}

#[test]
fn test_fit_to_bounds_centres_content() {
    let mut vp = Viewport::new(1000.0, 500.0);
    vp.fit_to_bounds(Bounds::new(0.0, 0.0, 100.0, 100.0), 0.0);
    assert_eq!(vp.zoom(), 5.0);
    assert_close(vp.canvas_to_screen(Point::new(50.0, 50.0)), Point::new(500.0, 250.0));

    let before = vp.clone();
    vp.fit_to_bounds(Bounds::new(10.0, 10.0, 10.0, 40.0), 0.1);
    assert_eq!(vp, before);
}
