//! Luminance histogram panel.
//!
//! Panel layout, all offsets in pixels from the panel's top-left:
//!
//! ```text
//!  10 ┌──────────── 256 bins ────────────┐
//!     │ bars, gridlines every 32 bins    │ 128 tall
//! 137 └──────────────────────────────────┘
//!       ticks at 0/64/128/192/255 (4 tall)
//! 148   0      64     128     192    255   (axis labels)
//! ```

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::fonts::SizedFont;

/// Left and top margin of the plot area.
pub const MARGIN: u32 = 10;
/// Height of the bar plot.
pub const PLOT_HEIGHT: u32 = 128;
/// Number of luminance bins.
pub const BINS: usize = 256;
/// Panel width.
pub const PANEL_WIDTH: u32 = BINS as u32 + 2 * MARGIN;

const BASELINE: f32 = (MARGIN + PLOT_HEIGHT - 1) as f32;
const GRID_EVERY: usize = 32;
const TICKS: [u32; 5] = [0, 64, 128, 192, 255];
const LABEL_OFFSET: u32 = 10;
const TICK_LENGTH: f32 = 3.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID_LIGHT: Rgb<u8> = Rgb([224, 224, 224]);
const GRID_DARK: Rgb<u8> = Rgb([64, 64, 64]);

/// Reference string measured for the axis label line height.
const LABEL_SAMPLE: &str = "1234567890";

/// Renders luminance histograms with axis labels.
pub struct HistogramRenderer<'a> {
    font: &'a SizedFont,
}

impl<'a> HistogramRenderer<'a> {
    pub fn new(font: &'a SizedFont) -> Self {
        Self { font }
    }

    /// 256-bin histogram of ITU-R 601 luma.
    pub fn luminance_histogram(image: &RgbImage) -> [u64; BINS] {
        let mut bins = [0u64; BINS];
        for pixel in image.pixels() {
            bins[luma(pixel) as usize] += 1;
        }
        bins
    }

    /// Panel dimensions; independent of image content.
    pub fn panel_size(&self) -> (u32, u32) {
        let (_, text_height) = self.font.measure(LABEL_SAMPLE);
        (PANEL_WIDTH, PLOT_HEIGHT + 25 + text_height)
    }

    /// Render the histogram panel for `image`.
    pub fn render(&self, image: &RgbImage) -> RgbImage {
        let bins = Self::luminance_histogram(image);
        let max = bins.iter().copied().max().unwrap_or(0);

        let (width, height) = self.panel_size();
        let mut panel = RgbImage::from_pixel(width, height, WHITE);

        for (i, &count) in bins.iter().enumerate() {
            let x = (i as u32 + MARGIN) as f32;
            let bar_top = BASELINE - bar_height(count, max);
            draw_line_segment_mut(&mut panel, (x, BASELINE), (x, bar_top), BLACK);
            if i > 0 && i % GRID_EVERY == 0 {
                draw_line_segment_mut(&mut panel, (x, BASELINE), (x, MARGIN as f32), GRID_LIGHT);
                draw_line_segment_mut(&mut panel, (x, BASELINE), (x, bar_top), GRID_DARK);
            }
        }

        let tick_top = (MARGIN + PLOT_HEIGHT) as f32;
        for tick in TICKS {
            let x = (tick + MARGIN) as f32;
            draw_line_segment_mut(&mut panel, (x, tick_top), (x, tick_top + TICK_LENGTH), BLACK);
        }

        let label_y = (MARGIN + PLOT_HEIGHT + LABEL_OFFSET) as i32;
        for (i, tick) in TICKS.iter().enumerate() {
            let label = tick.to_string();
            let (label_width, _) = self.font.measure(&label);
            let anchor = (tick + MARGIN) as i32;
            let x = match i {
                0 => anchor,
                i if i == TICKS.len() - 1 => anchor - label_width as i32,
                _ => anchor - label_width as i32 / 2,
            };
            self.font.draw(&mut panel, x, label_y, BLACK, &label);
        }

        panel
    }
}

/// Bar height scaled so the fullest bin spans the whole plot.
fn bar_height(count: u64, max: u64) -> f32 {
    if max == 0 {
        return 0.0;
    }
    PLOT_HEIGHT as f32 * count as f32 / max as f32
}

fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::test_support::fixture_fonts;

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(&Rgb([0, 0, 0])), 0);
        assert_eq!(luma(&Rgb([255, 255, 255])), 255);
        assert_eq!(luma(&Rgb([255, 0, 0])), 76);
        assert_eq!(luma(&Rgb([0, 255, 0])), 150);
        assert_eq!(luma(&Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn test_histogram_counts_every_pixel() {
        let mut image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        for x in 0..10 {
            image.put_pixel(x, 0, Rgb([255, 255, 255]));
        }
        let bins = HistogramRenderer::luminance_histogram(&image);
        assert_eq!(bins[0], 90);
        assert_eq!(bins[255], 10);
        assert_eq!(bins.iter().sum::<u64>(), 100);
    }

    #[test]
    fn test_panel_size_independent_of_content() {
        let fonts = fixture_fonts();
        let renderer = HistogramRenderer::new(&fonts.small);
        let (_, text_height) = fonts.small.measure("1234567890");

        let flat = renderer.render(&RgbImage::from_pixel(3, 3, Rgb([128, 128, 128])));
        let noisy = renderer.render(&RgbImage::from_fn(64, 48, |x, y| {
            Rgb([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
        }));
        let empty = renderer.render(&RgbImage::new(0, 0));

        let expected = (276, 153 + text_height);
        assert_eq!(flat.dimensions(), expected);
        assert_eq!(noisy.dimensions(), expected);
        assert_eq!(empty.dimensions(), expected);
    }

    #[test]
    fn test_full_bar_reaches_plot_top() {
        let fonts = fixture_fonts();
        let renderer = HistogramRenderer::new(&fonts.small);
        // All pixels in bin 100
        let panel = renderer.render(&RgbImage::from_pixel(4, 4, Rgb([100, 100, 100])));

        let x = 100 + MARGIN;
        assert_eq!(panel.get_pixel(x, MARGIN + PLOT_HEIGHT - 1), &BLACK);
        assert_eq!(panel.get_pixel(x, MARGIN), &BLACK);
        // Empty neighbouring bin only touches the baseline
        assert_eq!(panel.get_pixel(x + 1, MARGIN + 50), &WHITE);
    }

    #[test]
    fn test_gridline_over_bar_is_dark() {
        let fonts = fixture_fonts();
        let renderer = HistogramRenderer::new(&fonts.small);
        let mut image = RgbImage::from_pixel(4, 4, Rgb([64, 64, 64]));
        image.put_pixel(0, 0, Rgb([200, 200, 200]));
        let panel = renderer.render(&image);

        let x = 64 + MARGIN;
        // Bin 64 holds the max: dark all the way up
        assert_eq!(panel.get_pixel(x, MARGIN + 1), &GRID_DARK);
        // Bin 96 is empty: light gridline above the baseline
        assert_eq!(panel.get_pixel(96 + MARGIN, MARGIN + 20), &GRID_LIGHT);
        // Non-grid empty bin stays white
        assert_eq!(panel.get_pixel(97 + MARGIN, MARGIN + 20), &WHITE);
    }

    #[test]
    fn test_ticks_drawn_below_plot() {
        let fonts = fixture_fonts();
        let renderer = HistogramRenderer::new(&fonts.small);
        let panel = renderer.render(&RgbImage::new(2, 2));
        for tick in TICKS {
            assert_eq!(panel.get_pixel(tick + MARGIN, MARGIN + PLOT_HEIGHT + 2), &BLACK);
        }
        assert_eq!(panel.get_pixel(30 + MARGIN, MARGIN + PLOT_HEIGHT + 2), &WHITE);
    }
}
