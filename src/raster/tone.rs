//! Per-pixel colour and tone adjustments.

use image::{Rgba, RgbaImage};

use crate::canvas::TransformError;

type Lut = [u8; 256];

fn ensure_finite(name: &str, v: f64) -> Result<(), TransformError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TransformError::invalid(format!("{name} must be finite")))
    }
}

fn intensity(px: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b))
        .round()
        .clamp(0.0, 255.0) as u8
}

fn to_u8(v: f64) -> u8 {
    if v.is_finite() {
        v.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

fn lut_from(f: impl Fn(f64) -> f64) -> Lut {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = f(i as f64 / 255.0);
        *slot = if v.is_finite() {
            to_u8(v * 255.0)
        } else {
            i as u8
        };
    }
    lut
}

fn apply_luts(img: &mut RgbaImage, luts: &[Lut; 3]) {
    for px in img.pixels_mut() {
        for c in 0..3 {
            px.0[c] = luts[c][usize::from(px.0[c])];
        }
    }
}

fn apply_lut(img: &mut RgbaImage, lut: &Lut) {
    apply_luts(img, &[*lut, *lut, *lut]);
}

fn channel_histograms(img: &RgbaImage) -> [[u64; 256]; 3] {
    let mut hist = [[0u64; 256]; 3];
    for px in img.pixels() {
        for c in 0..3 {
            hist[c][usize::from(px.0[c])] += 1;
        }
    }
    hist
}

fn linear_stretch(lo: u8, hi: u8) -> Lut {
    let mut lut = [0u8; 256];
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = to_u8((i as f64 - lo) * 255.0 / (hi - lo));
    }
    lut
}

/// Clip `black`% darkest and `white`% brightest pixels by intensity, stretch the rest.
pub(crate) fn contrast_stretch(
    img: &mut RgbaImage,
    black: f64,
    white: f64,
) -> Result<(), TransformError> {
    ensure_finite("contrast stretch black point", black)?;
    ensure_finite("contrast stretch white point", white)?;
    if !(0.0..=100.0).contains(&black) || !(0.0..=100.0).contains(&white) {
        return Err(TransformError::invalid(
            "contrast stretch points must be within [0, 100] percent",
        ));
    }

    let mut hist = [0u64; 256];
    for px in img.pixels() {
        hist[usize::from(intensity(px))] += 1;
    }
    let total = u64::from(img.width()) * u64::from(img.height());
    let black_count = (black / 100.0 * total as f64) as u64;
    let white_count = (white / 100.0 * total as f64) as u64;

    let mut acc = 0u64;
    let mut lo = 0usize;
    for (i, n) in hist.iter().enumerate() {
        acc += n;
        if acc > black_count {
            lo = i;
            break;
        }
    }
    acc = 0;
    let mut hi = 255usize;
    for (i, n) in hist.iter().enumerate().rev() {
        acc += n;
        if acc > white_count {
            hi = i;
            break;
        }
    }

    if hi <= lo {
        return Ok(());
    }
    apply_lut(img, &linear_stretch(lo as u8, hi as u8));
    Ok(())
}

pub(crate) fn normalize(img: &mut RgbaImage) -> Result<(), TransformError> {
    contrast_stretch(img, 2.0, 1.0)
}

/// Brightness/saturation/hue in percent, 100 meaning unchanged.
///
/// Hue 0 and 200 are both a half turn.
pub(crate) fn modulate(
    img: &mut RgbaImage,
    brightness: f64,
    saturation: f64,
    hue: f64,
) -> Result<(), TransformError> {
    ensure_finite("modulate brightness", brightness)?;
    ensure_finite("modulate saturation", saturation)?;
    ensure_finite("modulate hue", hue)?;
    if brightness == 100.0 && saturation == 100.0 && hue == 100.0 {
        return Ok(());
    }

    let l_mul = (brightness / 100.0).max(0.0);
    let s_mul = (saturation / 100.0).max(0.0);
    let h_shift = (hue - 100.0) / 200.0;

    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        let (h, s, l) = rgb_to_hsl(r, g, b);
        let h = (h + h_shift).rem_euclid(1.0);
        let s = (s * s_mul).clamp(0.0, 1.0);
        let l = (l * l_mul).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        px.0 = [r, g, b, a];
    }
    Ok(())
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d <= f64::EPSILON {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s <= f64::EPSILON {
        let v = to_u8(l * 255.0);
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        to_u8(v * 255.0)
    };
    (
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

/// Sigmoidal contrast around `midpoint` percent; `sharpen == false` applies the inverse curve.
pub(crate) fn sigmoidal_contrast(
    img: &mut RgbaImage,
    sharpen: bool,
    contrast: f64,
    midpoint: f64,
) -> Result<(), TransformError> {
    ensure_finite("sigmoidal contrast", contrast)?;
    ensure_finite("sigmoidal midpoint", midpoint)?;
    if contrast.abs() < 1e-6 {
        return Ok(());
    }

    let m = midpoint / 100.0;
    let sig = |u: f64| 1.0 / (1.0 + (contrast * (m - u)).exp());
    let (s0, s1) = (sig(0.0), sig(1.0));
    let lut = if sharpen {
        lut_from(|u| (sig(u) - s0) / (s1 - s0))
    } else {
        lut_from(|v| {
            let y = v * (s1 - s0) + s0;
            m - (1.0 / y - 1.0).ln() / contrast
        })
    };
    apply_lut(img, &lut);
    Ok(())
}

pub(crate) fn equalize(img: &mut RgbaImage) -> Result<(), TransformError> {
    let hist = channel_histograms(img);
    let total = u64::from(img.width()) * u64::from(img.height());
    let mut luts = [[0u8; 256]; 3];
    for c in 0..3 {
        let first = hist[c].iter().copied().find(|n| *n > 0).unwrap_or(0);
        let denom = total.saturating_sub(first);
        let mut acc = 0u64;
        for (i, n) in hist[c].iter().enumerate() {
            acc += n;
            luts[c][i] = if denom == 0 {
                i as u8
            } else {
                to_u8(acc.saturating_sub(first) as f64 * 255.0 / denom as f64)
            };
        }
    }
    apply_luts(img, &luts);
    Ok(())
}

pub(crate) fn auto_level(img: &mut RgbaImage) -> Result<(), TransformError> {
    let hist = channel_histograms(img);
    let mut luts = [[0u8; 256]; 3];
    for c in 0..3 {
        let lo = hist[c].iter().position(|n| *n > 0).unwrap_or(0);
        let hi = hist[c].iter().rposition(|n| *n > 0).unwrap_or(255);
        luts[c] = if hi > lo {
            linear_stretch(lo as u8, hi as u8)
        } else {
            lut_from(|u| u)
        };
    }
    apply_luts(img, &luts);
    Ok(())
}

/// Per-channel gamma that moves each channel mean to mid-grey.
pub(crate) fn auto_gamma(img: &mut RgbaImage) -> Result<(), TransformError> {
    let hist = channel_histograms(img);
    let total = (u64::from(img.width()) * u64::from(img.height())) as f64;
    let mut luts = [[0u8; 256]; 3];
    for c in 0..3 {
        let sum: f64 = hist[c]
            .iter()
            .enumerate()
            .map(|(i, n)| i as f64 * *n as f64)
            .sum();
        let mean = sum / total / 255.0;
        luts[c] = if mean > 0.0 && mean < 1.0 {
            let gamma = 0.5f64.ln() / mean.ln();
            lut_from(|u| u.powf(gamma))
        } else {
            lut_from(|u| u)
        };
    }
    apply_luts(img, &luts);
    Ok(())
}

/// Simulate a night scene: pull every channel toward the pixel's min then max, scaled.
pub(crate) fn blue_shift(img: &mut RgbaImage, factor: f64) -> Result<(), TransformError> {
    ensure_finite("blue shift factor", factor)?;
    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        let rgb = [f64::from(r), f64::from(g), f64::from(b)];
        let min = rgb[0].min(rgb[1]).min(rgb[2]);
        let max = rgb[0].max(rgb[1]).max(rgb[2]);
        let shifted = rgb.map(|v| 0.5 * (v + factor * min));
        let out = shifted.map(|v| to_u8(0.5 * (v + factor * max)));
        px.0 = [out[0], out[1], out[2], a];
    }
    Ok(())
}

/// Invert every channel value above `threshold` (fraction of the full range).
pub(crate) fn solarize(img: &mut RgbaImage, threshold: f64) -> Result<(), TransformError> {
    ensure_finite("solarize threshold", threshold)?;
    let t = threshold * 255.0;
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = if i as f64 > t { 255 - i as u8 } else { i as u8 };
    }
    apply_lut(img, &lut);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/tone.rs"]
mod tests;
