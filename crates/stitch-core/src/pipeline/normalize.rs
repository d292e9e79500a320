//! Fit prepared photos to a common panel height (scale) or square (crop).

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::config::RenderMode;
use crate::types::RenderParams;

/// Brings every photo of a row to a comparable panel size.
pub struct FrameNormalizer {
    mode: RenderMode,
    max_height: u32,
    crop_size: u32,
}

impl FrameNormalizer {
    pub fn new(params: &RenderParams) -> Self {
        Self {
            mode: params.mode,
            max_height: params.max_height,
            crop_size: params.crop_size,
        }
    }

    /// Produce the panel for one photo.
    pub fn normalize(&self, image: &RgbImage) -> RgbImage {
        match self.mode {
            RenderMode::Scale => self.scale(image),
            RenderMode::Crop => self.crop(image),
        }
    }

    /// Height of the composite canvas.
    pub fn canvas_height(&self) -> u32 {
        match self.mode {
            RenderMode::Scale => self.max_height,
            RenderMode::Crop => self.crop_size,
        }
    }

    /// Width of the composite canvas for the given panel widths.
    pub fn canvas_width(panel_widths: &[u32], divider_width: u32) -> u32 {
        let gaps = panel_widths.len().saturating_sub(1) as u32;
        panel_widths.iter().sum::<u32>() + gaps * divider_width
    }

    /// Panel size after scaling; images already short enough keep their size.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        if height <= self.max_height {
            return (width, height);
        }
        let scaled_width = (width as u64 * self.max_height as u64 / height as u64) as u32;
        let scaled_width = scaled_width.max(1);
        (scaled_width, self.max_height)
    }

    fn scale(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let (target_w, target_h) = self.scaled_size(width, height);
        if (target_w, target_h) == (width, height) {
            return image.clone();
        }
        imageops::resize(image, target_w, target_h, FilterType::Lanczos3)
    }

    /// Centered `crop_size` square. Areas outside the photo stay black.
    fn crop(&self, image: &RgbImage) -> RgbImage {
        let size = self.crop_size;
        let (width, height) = image.dimensions();
        // Truncate toward zero so odd padding puts the spare pixel after the photo
        let left = (width as i64 - size as i64) / 2;
        let top = (height as i64 - size as i64) / 2;

        let mut panel = RgbImage::new(size, size);
        imageops::overlay(&mut panel, image, -left, -top);
        panel
    }
}
