use crate::{canvas::Canvas, foundation::core::Dims};

/// Crop request the reconciler would issue, if any: `(width, height, x, y)`.
///
/// Only the net-shrink pattern is corrected: strictly shorter than the original
/// and not wider. Every other combination is left alone.
pub fn reconcile_crop(original: Dims, mutated: Dims) -> Option<(u32, u32, u32, u32)> {
    let (width_delta, height_delta) = mutated.delta_from(original);
    if height_delta <= 0 || width_delta < 0 {
        return None;
    }

    let width = i64::from(mutated.width) + width_delta;
    let height = i64::from(mutated.height) + height_delta;
    Some((
        u32::try_from(width).ok()?,
        u32::try_from(height).ok()?,
        u32::try_from(width_delta / 2).ok()?,
        u32::try_from(height_delta / 2).ok()?,
    ))
}

/// Restore `image` toward the `original` footprint after a chain.
///
/// Returns whether a crop was issued.
pub fn reconcile<C: Canvas>(original: Dims, image: &mut C) -> bool {
    let mutated = image.dims();
    let Some((width, height, x, y)) = reconcile_crop(original, mutated) else {
        return false;
    };
    tracing::debug!(%original, %mutated, width, height, x, y, "reconcile crop");
    image.crop(width, height, x, y);
    true
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/reconcile.rs"]
mod tests;
