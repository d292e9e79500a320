//! Font loading and text drawing.
//!
//! One font file is loaded once per run and used at two pixel sizes: a small
//! size for histogram axis labels and a medium size for file info and the
//! decode-failure placeholder.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use crate::error::FontError;

/// Extra pixels between lines of multi-line text.
const LINE_SPACING: u32 = 4;

/// A font at a fixed pixel size.
#[derive(Clone)]
pub struct SizedFont {
    font: FontArc,
    scale: PxScale,
}

impl SizedFont {
    fn new(font: FontArc, size: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(size),
        }
    }

    /// Width and height of a single line of text.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    /// Vertical advance between successive lines.
    pub fn line_advance(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.height() + scaled.line_gap()).ceil() as u32 + LINE_SPACING
    }

    /// Draw a single line with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    /// Draw newline-separated text, one line per `line_advance`.
    pub fn draw_multiline(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        let advance = self.line_advance() as i32;
        for (i, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            self.draw(canvas, x, y + i as i32 * advance, color, line);
        }
    }
}

/// The two font sizes used while rendering a composite.
#[derive(Clone)]
pub struct FontSet {
    /// Histogram axis labels
    pub small: SizedFont,
    /// File info and placeholder text
    pub medium: SizedFont,
}

impl FontSet {
    /// Load a font file and prepare both sizes.
    pub fn load(path: &Path, small_size: f32, medium_size: f32) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid {
            path: path.to_path_buf(),
        })?;
        tracing::debug!("Loaded font {:?}", path);
        Ok(Self::from_font(font, small_size, medium_size))
    }

    /// Build both sizes from an already parsed font.
    pub fn from_font(font: FontArc, small_size: f32, medium_size: f32) -> Self {
        Self {
            small: SizedFont::new(font.clone(), small_size),
            medium: SizedFont::new(font, medium_size),
        }
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("small", &self.small.scale.y)
            .field("medium", &self.medium.scale.y)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_load_missing_font() {
        let err = FontSet::load(Path::new("/nonexistent/font.ttf"), 12.0, 16.0).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = FontSet::load(&path, 12.0, 16.0).unwrap_err();
        assert!(matches!(err, FontError::Invalid { .. }));
    }

    #[test]
    fn test_medium_lines_are_taller() {
        let fonts = fixture_fonts();
        assert!(fonts.medium.line_advance() > fonts.small.line_advance());
        let (w_small, _) = fonts.small.measure("1234567890");
        let (w_medium, _) = fonts.medium.measure("1234567890");
        assert!(w_medium > w_small);
    }

    #[test]
    fn test_draw_multiline_marks_pixels() {
        let fonts = fixture_fonts();
        let mut canvas = RgbImage::new(200, 80);
        fonts
            .medium
            .draw_multiline(&mut canvas, 2, 2, Rgb([255, 255, 255]), "first\nsecond");

        let advance = fonts.medium.line_advance();
        let lit_rows: Vec<u32> = (0..80)
            .filter(|&y| (0..200).any(|x| canvas.get_pixel(x, y)[0] > 0))
            .collect();
        assert!(!lit_rows.is_empty());
        assert!(*lit_rows.last().unwrap() >= advance);
    }
}
