//! Image decoding with content-based format detection and ICC profile capture.

use image::{DynamicImage, GenericImageView, ImageDecoder as _, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Embedded ICC profile, if any
    pub icc_profile: Option<Vec<u8>>,
    /// Raw file contents, kept for EXIF parsing
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Whether the source format carries camera EXIF metadata.
    pub fn is_photographic(&self) -> bool {
        matches!(self.format, ImageFormat::Jpeg)
    }
}

/// Stateless image decoder.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Read and decode an image file.
    pub fn decode(path: &Path) -> Result<DecodedImage, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::decode_bytes(bytes, path)
    }

    /// Decode an image from an in-memory byte buffer.
    pub fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        let reader = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::Decode {
                path: path.to_path_buf(),
                message: "Unrecognized image format".to_string(),
            })?,
        };
        let mut decoder = reader.into_decoder().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        // A broken profile shouldn't cost us the pixels
        let icc_profile = decoder.icc_profile().ok().flatten();
        let image = DynamicImage::from_decoder(decoder).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            icc_profile,
            bytes,
        })
    }
}
