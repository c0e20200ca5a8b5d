//! Neighbourhood filters: gaussian blur, unsharp mask, noise reduction, edge sketches.

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::canvas::TransformError;

const MAX_BLUR_RADIUS: u32 = 256;

/// Kernel radius covering three standard deviations.
fn radius_for_sigma(sigma: f64) -> u32 {
    ((sigma * 3.0).ceil().max(0.0) as u32).min(MAX_BLUR_RADIUS)
}

fn check_sigma(name: &str, sigma: f64) -> Result<(), TransformError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(TransformError::invalid(format!(
            "{name} sigma must be finite and >= 0"
        )));
    }
    Ok(())
}

/// Separable gaussian blur over an interleaved `channels`-per-pixel buffer.
fn blur_interleaved(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f64,
) -> Result<Vec<u8>, TransformError> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| TransformError::invalid("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TransformError::invalid(
            "blur expects a buffer matching width*height*channels",
        ));
    }
    let radius = radius_for_sigma(sigma);
    if radius == 0 || sigma <= 0.0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let dims = (width as i32, height as i32);
    pass(src, &mut tmp, dims, channels, &kernel, Axis::Horizontal);
    pass(&tmp, &mut out, dims, channels, &kernel, Axis::Vertical);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> Result<Vec<u32>, TransformError> {
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(TransformError::degenerate("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Fold rounding drift into the centre tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn pass(src: &[u8], dst: &mut [u8], dims: (i32, i32), channels: usize, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let (w, h) = dims;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * channels;
                for c in 0..channels {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * channels;
            for c in 0..channels {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

pub(crate) fn blur(img: &mut RgbaImage, sigma: f64) -> Result<(), TransformError> {
    check_sigma("blur", sigma)?;
    let (w, h) = img.dimensions();
    let out = blur_interleaved(img.as_raw(), w, h, 4, sigma)?;
    *img = RgbaImage::from_raw(w, h, out)
        .ok_or_else(|| TransformError::invalid("blur output size mismatch"))?;
    Ok(())
}

fn blur_gray(img: &GrayImage, sigma: f64) -> Result<GrayImage, TransformError> {
    let (w, h) = img.dimensions();
    let out = blur_interleaved(img.as_raw(), w, h, 1, sigma)?;
    GrayImage::from_raw(w, h, out).ok_or_else(|| TransformError::invalid("blur output size mismatch"))
}

/// Unsharp mask: push each colour channel away from its blurred value.
pub(crate) fn sharpen(img: &mut RgbaImage, sigma: f64) -> Result<(), TransformError> {
    check_sigma("sharpen", sigma)?;
    if radius_for_sigma(sigma) == 0 || sigma <= 0.0 {
        return Ok(());
    }
    let mut blurred = img.clone();
    blur(&mut blurred, sigma)?;
    for (px, soft) in img.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let v = 2 * i32::from(px.0[c]) - i32::from(soft.0[c]);
            px.0[c] = v.clamp(0, 255) as u8;
        }
    }
    Ok(())
}

/// Average each pixel with the 3x3 neighbours whose colour is close to it.
pub(crate) fn enhance(img: &mut RgbaImage) -> Result<(), TransformError> {
    const THRESHOLD: i32 = 48;
    let src = img.clone();
    let (w, h) = src.dimensions();
    for y in 0..h {
        for x in 0..w {
            let centre = src.get_pixel(x, y).0;
            let mut sum = [0u32; 3];
            let mut n = 0u32;
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let p = src.get_pixel(nx, ny).0;
                    let close = (0..3)
                        .all(|c| (i32::from(p[c]) - i32::from(centre[c])).abs() <= THRESHOLD);
                    if close {
                        for c in 0..3 {
                            sum[c] += u32::from(p[c]);
                        }
                        n += 1;
                    }
                }
            }
            let out = img.get_pixel_mut(x, y);
            for c in 0..3 {
                out.0[c] = ((sum[c] + n / 2) / n) as u8;
            }
        }
    }
    Ok(())
}

pub(crate) fn despeckle(img: &mut RgbaImage) -> Result<(), TransformError> {
    *img = imageproc::filter::median_filter(img, 1, 1);
    Ok(())
}

fn luminance(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        let v = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Average of `length` samples stepping along `angle` degrees from each pixel.
fn motion_blur(img: &GrayImage, length: f64, angle: f64) -> GrayImage {
    let steps = length.round().clamp(0.0, f64::from(MAX_BLUR_RADIUS)) as i32;
    if steps <= 1 {
        return img.clone();
    }
    let (dx, dy) = (angle.to_radians().cos(), angle.to_radians().sin());
    let (w, h) = (img.width() as i32, img.height() as i32);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let mut sum = 0u32;
        for t in 0..steps {
            let sx = (x as i32 + (dx * f64::from(t)).round() as i32).clamp(0, w - 1);
            let sy = (y as i32 + (dy * f64::from(t)).round() as i32).clamp(0, h - 1);
            sum += u32::from(img.get_pixel(sx as u32, sy as u32).0[0]);
        }
        Luma([(sum / steps as u32) as u8])
    })
}

/// Dark strokes on white where the gradient is strong.
fn inverted_edges(gray: &GrayImage, gain: f64) -> GrayImage {
    let grad = imageproc::gradients::sobel_gradients(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let g = f64::from(grad.get_pixel(x, y).0[0]) * gain;
        Luma([255 - g.round().clamp(0.0, 255.0) as u8])
    })
}

fn write_gray(img: &mut RgbaImage, gray: &GrayImage) {
    for (px, g) in img.pixels_mut().zip(gray.pixels()) {
        let v = g.0[0];
        *px = Rgba([v, v, v, px.0[3]]);
    }
}

/// Pencil sketch: edges of a directionally smeared luminance.
pub(crate) fn sketch(img: &mut RgbaImage, sigma: f64, angle: f64) -> Result<(), TransformError> {
    if !sigma.is_finite() || !angle.is_finite() {
        return Err(TransformError::invalid("sketch parameters must be finite"));
    }
    let gray = luminance(img);
    let smeared = motion_blur(&gray, sigma.abs() * 2.0, angle);
    write_gray(img, &inverted_edges(&smeared, 0.25));
    Ok(())
}

/// Charcoal: blurred, stretched, inverted edge map.
pub(crate) fn charcoal(img: &mut RgbaImage, sigma: f64) -> Result<(), TransformError> {
    check_sigma("charcoal", sigma)?;
    let gray = blur_gray(&luminance(img), sigma)?;
    let edges = inverted_edges(&gray, 0.5);
    let lo = edges.pixels().map(|p| p.0[0]).min().unwrap_or(0);
    let stretched = if lo < 255 {
        let span = f64::from(255 - lo);
        GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
            let v = f64::from(edges.get_pixel(x, y).0[0] - lo) * 255.0 / span;
            Luma([v.round() as u8])
        })
    } else {
        edges
    };
    write_gray(img, &stretched);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/filter.rs"]
mod tests;
