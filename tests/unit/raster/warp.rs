use image::{Rgba, RgbaImage};

use super::*;

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 90, 255])
    })
}

fn corners(w: f64, h: f64) -> [(f64, f64); 4] {
    [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
}

#[test]
fn zero_strength_warps_are_identity() {
    let base = gradient(20, 12);
    let mut img = base.clone();
    swirl(&mut img, 0.0).unwrap();
    implode(&mut img, 0.0).unwrap();
    rotate(&mut img, 0.0, [255; 4]).unwrap();
    wave(&mut img, 0.0, 30.0).unwrap();
    perspective(&mut img, &corners(20.0, 12.0), &corners(20.0, 12.0)).unwrap();
    assert_eq!(img, base);
}

#[test]
fn size_preserving_warps_keep_dimensions() {
    let base = gradient(31, 17);
    let mut img = base.clone();
    swirl(&mut img, 5.5).unwrap();
    wave(&mut img, 2.0, 12.0).unwrap();
    implode(&mut img, 0.08).unwrap();
    rotate(&mut img, 17.0, [255; 4]).unwrap();
    assert_eq!(img.dimensions(), (31, 17));
    assert_ne!(img, base);
}

#[test]
fn wave_rejects_zero_length() {
    let mut img = gradient(8, 8);
    let err = wave(&mut img, 1.0, 0.0).unwrap_err();
    assert_eq!(err.code(), 1);
    assert!(err.to_string().contains("wave length"));
}

#[test]
fn non_finite_parameters_are_rejected() {
    let mut img = gradient(8, 8);
    assert!(swirl(&mut img, f64::NAN).is_err());
    assert!(rotate(&mut img, f64::INFINITY, [0; 4]).is_err());
    let mut to = corners(8.0, 8.0);
    to[1].0 = f64::NAN;
    assert!(perspective(&mut img, &corners(8.0, 8.0), &to).is_err());
}

#[test]
fn rotate_exposes_fill_in_corners() {
    let mut img = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
    rotate(&mut img, 45.0, [255, 255, 255, 255]).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0, 255]);
}

#[test]
fn perspective_inward_corners_shrink_canvas() {
    let mut img = gradient(100, 80);
    let from = corners(100.0, 80.0);
    let to = [(10.0, 6.0), (92.0, 4.0), (8.0, 75.0), (95.0, 70.0)];
    perspective(&mut img, &from, &to).unwrap();
    // x spans [8, 95], y spans [4, 75]
    assert_eq!(img.dimensions(), (87, 71));
}

#[test]
fn perspective_outward_corners_never_grow() {
    let mut img = gradient(100, 80);
    let from = corners(100.0, 80.0);
    let to = [(-10.0, -6.0), (112.0, 3.0), (-4.0, 90.0), (104.0, 85.0)];
    perspective(&mut img, &from, &to).unwrap();
    assert_eq!(img.dimensions(), (100, 80));
}

#[test]
fn perspective_off_canvas_quad_is_degenerate() {
    let mut img = gradient(50, 50);
    let to = [(-40.0, -40.0), (-20.0, -40.0), (-40.0, -20.0), (-20.0, -20.0)];
    let err = perspective(&mut img, &corners(50.0, 50.0), &to).unwrap_err();
    assert_eq!(err.code(), 2);
    assert_eq!(img.dimensions(), (50, 50));
}
