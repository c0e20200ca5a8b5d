use std::{fs::File, io::BufWriter, path::Path};

use image::{DynamicImage, ImageFormat, ImageReader, codecs::jpeg::JpegEncoder};

use crate::{
    batch::store::ImageStore,
    foundation::error::{MutateError, MutateResult},
    raster::RasterImage,
};

pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Reads inputs from disk and writes variants with the format implied by their extension.
#[derive(Clone, Copy, Debug)]
pub struct FsImageStore {
    pub jpeg_quality: u8,
}

impl Default for FsImageStore {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FsImageStore {
    pub fn with_jpeg_quality(quality: u8) -> MutateResult<Self> {
        if !(1..=100).contains(&quality) {
            return Err(MutateError::validation("jpeg quality must be within 1..=100"));
        }
        Ok(Self {
            jpeg_quality: quality,
        })
    }
}

/// Decode any format `image` recognises into a [`RasterImage`].
///
/// The format is sniffed from the file contents, not the extension.
pub fn load_image(path: &Path) -> MutateResult<RasterImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| MutateError::load(path, e))?
        .with_guessed_format()
        .map_err(|e| MutateError::load(path, e))?;
    let decoded = reader.decode().map_err(|e| MutateError::load(path, e))?;
    Ok(RasterImage::new(decoded.to_rgba8()))
}

impl ImageStore for FsImageStore {
    type Image = RasterImage;

    fn load(&self, path: &Path) -> MutateResult<RasterImage> {
        load_image(path)
    }

    fn write(&self, image: &RasterImage, path: &Path) -> MutateResult<()> {
        let format = ImageFormat::from_path(path).map_err(|e| MutateError::write(path, e))?;
        let pixels = image.pixels();

        if format == ImageFormat::Jpeg {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
            let file = File::create(path).map_err(|e| MutateError::write(path, e))?;
            let mut out = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
                .encode_image(&rgb)
                .map_err(|e| MutateError::write(path, e))?;
            return Ok(());
        }

        pixels
            .save_with_format(path, format)
            .map_err(|e| MutateError::write(path, e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/io.rs"]
mod tests;
