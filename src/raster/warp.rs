//! Geometric distortions. All of them keep the canvas size except [`perspective`].

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{
    Interpolation, Projection, rotate_about_center, warp, warp_with,
};

use crate::canvas::TransformError;

const EDGE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn centre(img: &RgbaImage) -> (f32, f32) {
    (img.width() as f32 / 2.0, img.height() as f32 / 2.0)
}

fn ensure_finite(name: &str, v: f64) -> Result<(), TransformError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TransformError::invalid(format!("{name} must be finite")))
    }
}

/// Twist pixels around the centre; strongest at the centre, fading to zero at the radius.
pub(crate) fn swirl(img: &mut RgbaImage, degrees: f64) -> Result<(), TransformError> {
    ensure_finite("swirl degrees", degrees)?;
    if degrees == 0.0 {
        return Ok(());
    }
    let (cx, cy) = centre(img);
    let radius = cx.max(cy);
    let max_theta = degrees.to_radians() as f32;
    *img = warp_with(
        img,
        move |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let r = (dx * dx + dy * dy).sqrt();
            if r >= radius {
                return (x, y);
            }
            let f = 1.0 - r / radius;
            let theta = max_theta * f * f;
            let (s, c) = theta.sin_cos();
            (cx + dx * c - dy * s, cy + dx * s + dy * c)
        },
        Interpolation::Bilinear,
        EDGE_FILL,
    );
    Ok(())
}

/// Displace columns vertically along a sine wave.
pub(crate) fn wave(
    img: &mut RgbaImage,
    amplitude: f64,
    wave_length: f64,
) -> Result<(), TransformError> {
    ensure_finite("wave amplitude", amplitude)?;
    ensure_finite("wave length", wave_length)?;
    if wave_length <= f64::EPSILON {
        return Err(TransformError::invalid("wave length must be > 0"));
    }
    if amplitude == 0.0 {
        return Ok(());
    }
    let amplitude = amplitude as f32;
    let k = (std::f64::consts::TAU / wave_length) as f32;
    *img = warp_with(
        img,
        move |x, y| (x, y - amplitude * (k * x).sin()),
        Interpolation::Bilinear,
        EDGE_FILL,
    );
    Ok(())
}

/// Pull pixels toward (positive amount) or push them away from the centre.
pub(crate) fn implode(img: &mut RgbaImage, amount: f64) -> Result<(), TransformError> {
    ensure_finite("implode amount", amount)?;
    if amount == 0.0 {
        return Ok(());
    }
    let (cx, cy) = centre(img);
    let radius = cx.min(cy).max(1.0);
    let amount = amount as f32;
    *img = warp_with(
        img,
        move |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let r = (dx * dx + dy * dy).sqrt() / radius;
            if r >= 1.0 || r <= 0.0 {
                return (x, y);
            }
            let base = (std::f32::consts::FRAC_PI_2 * r.sqrt()).sin();
            let factor = base.powf(-amount);
            (cx + dx * factor, cy + dy * factor)
        },
        Interpolation::Bilinear,
        EDGE_FILL,
    );
    Ok(())
}

/// Rotate about the centre on a same-size canvas, exposing `fill` at the corners.
pub(crate) fn rotate(img: &mut RgbaImage, degrees: f64, fill: [u8; 4]) -> Result<(), TransformError> {
    ensure_finite("rotate degrees", degrees)?;
    if degrees == 0.0 {
        return Ok(());
    }
    *img = rotate_about_center(
        img,
        degrees.to_radians() as f32,
        Interpolation::Bilinear,
        Rgba(fill),
    );
    Ok(())
}

/// Move the four corners to `to` and trim the canvas to the displaced quad.
///
/// The output is the bounding box of `to` clipped to the source canvas, so it can
/// only shrink.
pub(crate) fn perspective(
    img: &mut RgbaImage,
    from: &[(f64, f64); 4],
    to: &[(f64, f64); 4],
) -> Result<(), TransformError> {
    if from.iter().chain(to).any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(TransformError::invalid("perspective control points must be finite"));
    }
    if from == to {
        return Ok(());
    }

    let as_f32 = |pts: &[(f64, f64); 4]| pts.map(|(x, y)| (x as f32, y as f32));
    let projection = Projection::from_control_points(as_f32(from), as_f32(to))
        .ok_or_else(|| TransformError::degenerate("perspective control points are collinear"))?;

    let (w, h) = (f64::from(img.width()), f64::from(img.height()));
    let min_x = to.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = to.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = to.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = to.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.max(0.0).floor();
    let y0 = min_y.max(0.0).floor();
    let x1 = max_x.min(w).ceil();
    let y1 = max_y.min(h).ceil();
    if x1 <= x0 || y1 <= y0 {
        return Err(TransformError::degenerate(
            "displaced quad does not overlap the canvas",
        ));
    }

    let warped = warp(img, &projection, Interpolation::Bilinear, Rgba([0, 0, 0, 0]));
    *img = image::imageops::crop_imm(
        &warped,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/warp.rs"]
mod tests;
