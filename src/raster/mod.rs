//! CPU raster backend: an RGBA8 [`Canvas`] built on `image` and `imageproc`.

mod filter;
pub mod io;
mod tone;
mod warp;

use image::RgbaImage;

use crate::{
    canvas::{Canvas, Transform, TransformError},
    foundation::core::Dims,
};

/// Straight-alpha RGBA8 image handle.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

impl Canvas for RasterImage {
    fn dims(&self) -> Dims {
        let (width, height) = self.pixels.dimensions();
        Dims { width, height }
    }

    fn crop(&mut self, width: u32, height: u32, x: u32, y: u32) {
        let (w, h) = self.pixels.dimensions();
        let (width, height) = (width.min(w), height.min(h));
        let (x, y) = (x.min(w - width), y.min(h - height));
        self.pixels = image::imageops::crop_imm(&self.pixels, x, y, width, height).to_image();
    }

    fn apply(&mut self, transform: &Transform) -> Result<(), TransformError> {
        if self.dims().is_empty() {
            return Err(TransformError::EmptyImage);
        }

        let img = &mut self.pixels;
        match *transform {
            Transform::Identity => Ok(()),
            Transform::ContrastStretch { black, white } => tone::contrast_stretch(img, black, white),
            Transform::Blur { sigma } => filter::blur(img, sigma),
            Transform::Sharpen { sigma } => filter::sharpen(img, sigma),
            Transform::Solarize { threshold } => tone::solarize(img, threshold),
            Transform::Normalize => tone::normalize(img),
            Transform::Modulate {
                brightness,
                saturation,
                hue,
            } => tone::modulate(img, brightness, saturation, hue),
            Transform::SigmoidalContrast {
                sharpen,
                contrast,
                midpoint,
            } => tone::sigmoidal_contrast(img, sharpen, contrast, midpoint),
            Transform::Sketch { sigma, angle } => filter::sketch(img, sigma, angle),
            Transform::Swirl { degrees } => warp::swirl(img, degrees),
            Transform::Wave {
                amplitude,
                wave_length,
            } => warp::wave(img, amplitude, wave_length),
            Transform::Implode { amount } => warp::implode(img, amount),
            Transform::Equalize => tone::equalize(img),
            Transform::Enhance => filter::enhance(img),
            Transform::AutoLevel => tone::auto_level(img),
            Transform::AutoGamma => tone::auto_gamma(img),
            Transform::BlueShift { factor } => tone::blue_shift(img, factor),
            Transform::Despeckle => filter::despeckle(img),
            Transform::Perspective { ref from, ref to } => warp::perspective(img, from, to),
            Transform::Rotate { degrees, fill } => warp::rotate(img, degrees, fill),
            Transform::Charcoal { sigma } => filter::charcoal(img, sigma),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
