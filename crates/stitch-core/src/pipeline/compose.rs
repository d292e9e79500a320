//! Row compositing and JPEG output.

use image::imageops;
use image::RgbImage;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use std::path::Path;

use super::annotate::{ExifAnnotator, FileInfo};
use super::histogram::HistogramRenderer;
use super::normalize::FrameNormalizer;
use super::preprocess::PreparedImage;
use crate::error::{PipelineError, PipelineResult};
use crate::types::RenderParams;

/// Offset of the first overlay from a panel's top-left corner.
pub const OVERLAY_OFFSET: u32 = 10;

/// Assembles the panels of one row into a single strip.
pub struct Compositor<'a> {
    params: &'a RenderParams,
    normalizer: FrameNormalizer,
}

impl<'a> Compositor<'a> {
    pub fn new(params: &'a RenderParams) -> Self {
        Self {
            params,
            normalizer: FrameNormalizer::new(params),
        }
    }

    /// Normalize one photo and draw its overlays.
    ///
    /// The histogram describes the photo before scaling or cropping.
    pub fn render_panel(&self, prepared: &PreparedImage) -> RgbImage {
        let mut panel = self.normalizer.normalize(&prepared.image);
        let mut text_y = OVERLAY_OFFSET;

        if self.params.show_histogram {
            let histogram = HistogramRenderer::new(&self.params.fonts.small).render(&prepared.image);
            imageops::overlay(
                &mut panel,
                &histogram,
                OVERLAY_OFFSET as i64,
                OVERLAY_OFFSET as i64,
            );
            text_y += histogram.height() + OVERLAY_OFFSET;
        }

        if self.params.show_file_info {
            let (width, height) = prepared.image.dimensions();
            let info = FileInfo {
                file_name: &prepared.file_name,
                file_size: prepared.file_size,
                width,
                height,
                metadata: prepared.metadata.as_ref(),
            };
            ExifAnnotator::new(&self.params.fonts.medium, self.params.font_color).draw(
                &mut panel,
                OVERLAY_OFFSET as i32,
                text_y as i32,
                &info,
            );
        }

        panel
    }

    /// Build the full strip, left to right in input order.
    pub fn compose(&self, row: &[PreparedImage]) -> RgbImage {
        let panels: Vec<RgbImage> = row.iter().map(|p| self.render_panel(p)).collect();
        self.assemble(&panels)
    }

    /// Paste finished panels onto a divider-coloured canvas.
    pub fn assemble(&self, panels: &[RgbImage]) -> RgbImage {
        let widths: Vec<u32> = panels.iter().map(|p| p.width()).collect();
        let width = FrameNormalizer::canvas_width(&widths, self.params.divider_width);
        let height = self.normalizer.canvas_height();

        let mut canvas = RgbImage::from_pixel(width, height, self.params.divider_color);
        let mut x = 0i64;
        for panel in panels {
            imageops::overlay(&mut canvas, panel, x, 0);
            x += panel.width() as i64 + self.params.divider_width as i64;
        }
        canvas
    }

    /// Encode `canvas` as a 4:4:4 JPEG and write it to `path`.
    pub fn write_jpeg(&self, canvas: &RgbImage, path: &Path) -> PipelineResult<()> {
        write_jpeg(canvas, path, self.params.jpeg_quality)
    }
}

/// Encode with chroma subsampling disabled and optimized Huffman tables.
pub fn write_jpeg(canvas: &RgbImage, path: &Path, quality: u8) -> PipelineResult<()> {
    let (width, height) = canvas.dimensions();
    let encode_error = |message: String| PipelineError::Encode {
        path: path.to_path_buf(),
        message,
    };
    let width = u16::try_from(width)
        .map_err(|_| encode_error(format!("canvas width {} exceeds the JPEG limit", width)))?;
    let height = u16::try_from(height)
        .map_err(|_| encode_error(format!("canvas height {} exceeds the JPEG limit", height)))?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality);
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(canvas.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| encode_error(e.to_string()))?;

    std::fs::write(path, &bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote {:?} ({}x{}, {} bytes)", path, width, height, bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RenderMode};
    use crate::fonts::test_support::fixture_fonts;
    use image::Rgb;

    fn params(configure: impl FnOnce(&mut Config)) -> RenderParams {
        let mut config = Config::default();
        configure(&mut config);
        RenderParams::from_config(&config, fixture_fonts())
    }

    fn prepared(width: u32, height: u32, color: [u8; 3]) -> PreparedImage {
        PreparedImage {
            image: RgbImage::from_pixel(width, height, Rgb(color)),
            metadata: None,
            file_name: "frame.png".to_string(),
            file_size: 2048,
            is_placeholder: false,
        }
    }

    #[test]
    fn test_scale_canvas_width_sums_panels() {
        let params = params(|c| {
            c.render.max_height = 100;
            c.render.show_histogram = false;
            c.render.show_file_info = false;
        });
        let compositor = Compositor::new(&params);
        let canvas = compositor.compose(&[
            prepared(400, 300, [200, 0, 0]),
            prepared(150, 200, [0, 200, 0]),
            prepared(60, 80, [0, 0, 200]),
        ]);
        // 133 + 75 + 60 panels, two 3px dividers
        assert_eq!(canvas.dimensions(), (133 + 75 + 60 + 6, 100));
    }

    #[test]
    fn test_crop_canvas_width() {
        let params = params(|c| {
            c.render.mode = RenderMode::Crop;
            c.render.crop_size = 50;
            c.render.divider_width = 5;
        });
        let compositor = Compositor::new(&params);
        let row: Vec<PreparedImage> = (0..4).map(|_| prepared(300, 300, [90, 90, 90])).collect();
        assert_eq!(compositor.compose(&row).dimensions(), (4 * 50 + 3 * 5, 50));
    }

    #[test]
    fn test_dividers_and_padding_use_divider_color() {
        let params = params(|c| {
            c.render.max_height = 40;
            c.render.divider_width = 2;
            c.render.divider_color = [255, 0, 255];
            c.render.show_histogram = false;
            c.render.show_file_info = false;
        });
        let compositor = Compositor::new(&params);
        let canvas = compositor.compose(&[prepared(10, 40, [1, 1, 1]), prepared(10, 20, [2, 2, 2])]);

        assert_eq!(canvas.dimensions(), (22, 40));
        assert_eq!(canvas.get_pixel(9, 0), &Rgb([1, 1, 1]));
        assert_eq!(canvas.get_pixel(10, 0), &Rgb([255, 0, 255]));
        assert_eq!(canvas.get_pixel(11, 39), &Rgb([255, 0, 255]));
        assert_eq!(canvas.get_pixel(12, 0), &Rgb([2, 2, 2]));
        // Short panel is not stretched
        assert_eq!(canvas.get_pixel(12, 30), &Rgb([255, 0, 255]));
    }

    #[test]
    fn test_histogram_overlay_position() {
        let params = params(|c| {
            c.render.max_height = 1000;
            c.render.show_file_info = false;
        });
        let compositor = Compositor::new(&params);
        let panel = compositor.render_panel(&prepared(400, 300, [0, 0, 200]));

        // Panel background is white, the photo is blue
        assert_eq!(panel.get_pixel(OVERLAY_OFFSET, OVERLAY_OFFSET), &Rgb([255, 255, 255]));
        assert_eq!(panel.get_pixel(OVERLAY_OFFSET - 1, OVERLAY_OFFSET), &Rgb([0, 0, 200]));
        assert_eq!(panel.get_pixel(OVERLAY_OFFSET + 275, OVERLAY_OFFSET), &Rgb([255, 255, 255]));
        assert_eq!(panel.get_pixel(OVERLAY_OFFSET + 276, OVERLAY_OFFSET), &Rgb([0, 0, 200]));
    }

    fn is_green(p: &Rgb<u8>) -> bool {
        p[1] > 200 && p[0] < 60 && p[2] < 60
    }

    #[test]
    fn test_file_info_drawn_below_histogram() {
        let params = params(|c| {
            c.render.max_height = 1000;
            c.render.font_color = [0, 255, 0];
        });
        let compositor = Compositor::new(&params);
        let panel = compositor.render_panel(&prepared(400, 400, [128, 128, 128]));

        let (_, text_height) = params.fonts.small.measure("1234567890");
        let histogram_bottom = OVERLAY_OFFSET + 153 + text_height;
        let green_rows: Vec<u32> = (0..400)
            .filter(|&y| (0..400).any(|x| is_green(panel.get_pixel(x, y))))
            .collect();
        assert!(!green_rows.is_empty());
        assert!(green_rows.iter().all(|&y| y >= histogram_bottom));
    }

    #[test]
    fn test_write_jpeg_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("row.jpg");
        let canvas = RgbImage::from_fn(37, 21, |x, y| Rgb([(x * 6) as u8, (y * 12) as u8, 80]));

        write_jpeg(&canvas, &path, 95).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (37, 21));
    }

    #[test]
    fn test_write_jpeg_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("row.jpg");
        let err = write_jpeg(&RgbImage::new(4, 4), &path, 95).unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
    }

    #[test]
    fn test_write_jpeg_rejects_oversized_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.jpg");
        let err = write_jpeg(&RgbImage::new(70_000, 1), &path, 95).unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
        assert!(!path.exists());
    }
}
