use image::{Rgba, RgbaImage};

use super::*;
use crate::{
    foundation::core::Chaos,
    mutation::{operation::Operation, sampler::RngSampler},
};

fn sample_image() -> RasterImage {
    RasterImage::new(RgbaImage::from_fn(48, 32, |x, y| {
        Rgba([(x * 5) as u8, (y * 7) as u8, ((x + y) * 3) as u8, 255])
    }))
}

#[test]
fn every_operation_runs_and_never_grows_the_canvas() {
    let source = sample_image();
    let ops = Operation::STANDARD.into_iter().chain(Operation::OPT_IN);
    for (i, op) in ops.enumerate() {
        for chaos in [0.0, 0.25, 1.0] {
            let mut img = source.clone();
            let mut s = RngSampler::seeded(i as u64 * 31 + 7);
            let (transform, outcome) = op.apply(&mut img, &mut s, Chaos::new(chaos).unwrap());
            match outcome {
                Ok(()) => {}
                // A near-zero sampled wave length is a legitimate failure.
                Err(TransformError::InvalidParameter(_)) if op == Operation::Wave => {}
                Err(e) => panic!("{op} at chaos {chaos} failed: {e} ({transform:?})"),
            }
            assert!(img.dims().fits_within(source.dims()), "{op} grew the canvas");
            if !op.is_size_altering() {
                assert_eq!(img.dims(), source.dims(), "{op} changed size");
            }
        }
    }
}

#[test]
fn crop_clamps_to_bounds() {
    let mut img = sample_image();
    img.crop(10, 8, 4, 2);
    assert_eq!(img.dims(), Dims::new(10, 8));
    assert_eq!(img.pixels().get_pixel(0, 0).0, [20, 14, 18, 255]);

    let mut img = sample_image();
    img.crop(40, 30, 20, 10);
    assert_eq!(img.dims(), Dims::new(40, 30));
    assert_eq!(img.pixels().get_pixel(0, 0).0, [40, 14, 30, 255]);

    let mut img = sample_image();
    img.crop(100, 100, 20, 10);
    assert_eq!(img, sample_image());
}

#[test]
fn reconciling_a_heavily_shrunken_raster_keeps_its_pixels() {
    let mut img = RasterImage::new(RgbaImage::from_fn(30, 30, |x, y| {
        Rgba([x as u8, y as u8, 0, 255])
    }));
    let before = img.clone();

    assert!(crate::mutation::reconcile::reconcile(Dims::new(90, 90), &mut img));
    assert_eq!(img.dims(), Dims::new(30, 30));
    assert_eq!(img, before);
}

#[test]
fn empty_image_reports_failure() {
    let mut img = RasterImage::new(RgbaImage::new(0, 5));
    let err = img.apply(&Transform::Identity).unwrap_err();
    assert_eq!(err, TransformError::EmptyImage);
    assert_eq!(err.code(), 3);
}

#[test]
fn identity_leaves_pixels_untouched() {
    let mut img = sample_image();
    img.apply(&Transform::Identity).unwrap();
    assert_eq!(img, sample_image());
}
