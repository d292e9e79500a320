//! ICC colour management: convert embedded-profile pixels to sRGB.

use image::RgbImage;
use lcms2::{InfoType, Intent, Locale, PixelFormat, Profile, Transform};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Description used when a profile carries no readable description tag.
const UNNAMED_PROFILE: &str = "Unnamed ICC profile";

/// Converts pixel buffers from embedded ICC profiles to sRGB.
pub struct ColorConverter;

impl ColorConverter {
    /// Convert `image` in place from the given ICC profile to sRGB.
    ///
    /// Returns the profile's human-readable description. `path` only labels
    /// the error.
    pub fn to_srgb(image: &mut RgbImage, icc: &[u8], path: &Path) -> PipelineResult<String> {
        let transform_error = |e: lcms2::Error| PipelineError::ColorTransform {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let source = Profile::new_icc(icc).map_err(transform_error)?;
        let description = Self::describe(&source);

        let srgb = Profile::new_srgb();
        let transform = Transform::<u8, u8>::new(
            &source,
            PixelFormat::RGB_8,
            &srgb,
            PixelFormat::RGB_8,
            Intent::Perceptual,
        )
        .map_err(transform_error)?;
        let pixels: &mut [u8] = image;
        transform.transform_in_place(pixels);

        Ok(description)
    }

    /// Human-readable description of an ICC profile.
    pub fn describe(profile: &Profile) -> String {
        profile
            .info(InfoType::Description, Locale::none())
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNNAMED_PROFILE.to_string())
    }
}
