use std::path::Path;

use crate::{
    canvas::Canvas,
    foundation::error::{MutateError, MutateResult},
};

/// Load/write capability the batch controller delegates file handling to.
pub trait ImageStore: Sync {
    type Image: Canvas;

    fn load(&self, path: &Path) -> MutateResult<Self::Image>;

    /// Encode `image` to `path`; the format is implied by the extension.
    fn write(&self, image: &Self::Image, path: &Path) -> MutateResult<()>;
}

/// Fails unless `dir` exists and is a directory.
pub fn ensure_output_dir(dir: &Path) -> MutateResult<()> {
    let meta = std::fs::metadata(dir)
        .map_err(|e| MutateError::output(dir, format!("could not open directory: {e}")))?;
    if !meta.is_dir() {
        return Err(MutateError::output(dir, "not a directory"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/batch/store.rs"]
mod tests;
