//! Per-photo preparation: decode, colour-correct, orient.
//!
//! Decode failures are not errors here. An unreadable file is replaced by a
//! placeholder panel so the rest of the row still renders.

use image::imageops;
use image::RgbImage;
use std::path::Path;

use super::color::ColorConverter;
use super::decode::ImageDecoder;
use super::metadata::MetadataExtractor;
use crate::types::{Metadata, RenderParams};

/// Side of the square placeholder used for unreadable files.
pub const PLACEHOLDER_SIZE: u32 = 500;

/// A photo ready for normalization and annotation.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Oriented, sRGB pixels at full resolution
    pub image: RgbImage,
    /// Camera metadata; `None` for non-photographic sources
    pub metadata: Option<Metadata>,
    /// Source file name
    pub file_name: String,
    /// Source file size in bytes
    pub file_size: u64,
    /// Whether decoding failed and `image` is a placeholder
    pub is_placeholder: bool,
}

/// Loads photos and brings them into a common orientation and colour space.
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Load and normalize one photo.
    pub fn load(path: &Path, params: &RenderParams) -> PreparedImage {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let decoded = match ImageDecoder::decode(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("{} - substituting placeholder", e);
                return PreparedImage {
                    image: Self::placeholder(params),
                    metadata: None,
                    file_name,
                    file_size,
                    is_placeholder: true,
                };
            }
        };

        let photographic = decoded.is_photographic();
        let mut metadata = if photographic {
            // A JPEG without an EXIF block still reports every field as missing
            Some(MetadataExtractor::from_bytes(&decoded.bytes).unwrap_or_default())
        } else {
            None
        };

        let mut image = decoded.image.into_rgb8();
        // Only camera JPEGs are colour managed; other formats keep their pixels
        if let (Some(meta), Some(icc)) = (metadata.as_mut(), decoded.icc_profile.as_deref()) {
            match ColorConverter::to_srgb(&mut image, icc, path) {
                Ok(description) => {
                    tracing::debug!("Converted {:?} from '{}' to sRGB", path, description);
                    meta.color_space = Some(description);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        let orientation = metadata.as_ref().and_then(|m| m.orientation);
        let image = Self::apply_orientation(image, orientation);

        PreparedImage {
            image,
            metadata,
            file_name,
            file_size,
            is_placeholder: false,
        }
    }

    /// Undo camera rotation recorded in the EXIF orientation tag.
    ///
    /// Only the rotation codes are honoured: 3 turns 180°, 6 turns 270° and
    /// 8 turns 90° counter-clockwise. Mirrored codes (2, 4, 5, 7) are left
    /// untouched.
    pub fn apply_orientation(image: RgbImage, orientation: Option<u16>) -> RgbImage {
        match orientation {
            Some(3) => imageops::rotate180(&image),
            Some(6) => imageops::rotate90(&image),
            Some(8) => imageops::rotate270(&image),
            _ => image,
        }
    }

    /// Divider-coloured panel labelled "IO error".
    pub fn placeholder(params: &RenderParams) -> RgbImage {
        let mut image = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, params.divider_color);
        params
            .fonts
            .medium
            .draw(&mut image, 200, 350, params.font_color, "IO error");
        image
    }
}
