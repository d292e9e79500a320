//! File info and EXIF summary text drawn over each panel.
//!
//! Every field has a fixed fallback: most print `None` when the tag is
//! missing, a few lines are dropped instead. The exact text matters, people
//! diff these montages across runs.

use image::{Rgb, RgbImage};

use crate::fonts::SizedFont;
use crate::types::{Metadata, Ratio, SignedRatio};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
const SUSPECT: &str = " (Maybe incorrect)";

/// Everything the annotation needs to know about one photo.
#[derive(Debug, Clone, Copy)]
pub struct FileInfo<'a> {
    pub file_name: &'a str,
    pub file_size: u64,
    /// Dimensions before scaling or cropping
    pub width: u32,
    pub height: u32,
    pub metadata: Option<&'a Metadata>,
}

/// Formats and draws the file info block.
pub struct ExifAnnotator<'a> {
    font: &'a SizedFont,
    color: Rgb<u8>,
}

impl<'a> ExifAnnotator<'a> {
    pub fn new(font: &'a SizedFont, color: Rgb<u8>) -> Self {
        Self { font, color }
    }

    /// Draw the block at `(x, y)` with a one-pixel black shadow.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, info: &FileInfo<'_>) {
        let text = format_lines(info).join("\n");
        self.font.draw_multiline(canvas, x + 1, y + 1, SHADOW, &text);
        self.font.draw_multiline(canvas, x, y, self.color, &text);
    }
}

/// Build the annotation lines in display order.
pub fn format_lines(info: &FileInfo<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{}, {}x{}, {:.2}MiB",
        info.file_name,
        info.width,
        info.height,
        info.file_size as f64 / BYTES_PER_MIB
    )];

    let Some(meta) = info.metadata else {
        lines.push("EXIF is None".to_string());
        return lines;
    };

    lines.push(format!("DateTime: {}", meta.date_time.as_deref().unwrap_or("None")));
    lines.push(exposure_line(meta));

    if let Some(description) = meta.image_description.as_deref().map(until_nul) {
        if !description.trim().is_empty() {
            lines.push(format!("ImageDescription: {}", description));
        }
    }

    lines.push(format!(
        "Make: {}",
        meta.make.as_deref().map(until_nul).unwrap_or("None")
    ));
    lines.push(format!(
        "Model: {}",
        meta.model.as_deref().map(until_nul).unwrap_or("None")
    ));

    lines.push(format!(
        "ExposureProgram: {}",
        meta.exposure_program
            .map(exposure_program_name)
            .unwrap_or("None")
    ));

    if let Some(bias) = meta.exposure_bias.and_then(format_exposure_bias) {
        lines.push(format!("ExposureBiasValue: {} EV", bias));
    }

    lines.push(format!(
        "MeteringMode: {}",
        meta.metering_mode.map(metering_mode_name).unwrap_or("None")
    ));

    if let Some(flash) = meta.flash {
        let fired = if flash & 0x01 == 1 {
            "Flash fired"
        } else {
            "Flash did not fire"
        };
        lines.push(format!("Flash: {}", fired));
    }

    if let Some(color_space) = &meta.color_space {
        lines.push(format!("Color space: {}", color_space));
    }

    lines
}

/// `"<time>  f/<n>  ISO:<iso>  "`, each part falling back to `None`.
fn exposure_line(meta: &Metadata) -> String {
    let time = meta
        .exposure_time
        .map(format_exposure_time)
        .unwrap_or_else(|| "None".to_string());
    let aperture = meta
        .f_number
        .and_then(format_f_number)
        .unwrap_or_else(|| "None".to_string());
    let iso = meta
        .iso
        .map(|iso| format!("ISO:{}", iso))
        .unwrap_or_else(|| "None".to_string());
    format!("{}  {}  {}  ", time, aperture, iso)
}

/// Shutter speed as seconds (long exposures) or `1/N` (fast ones).
///
/// A zero on either side of the fraction is reported raw with a warning.
pub fn format_exposure_time(time: Ratio) -> String {
    if time.num > time.denom {
        if time.denom == 0 {
            format!("{}{}", time.num, SUSPECT)
        } else {
            format!("{}", time.num as f64 / time.denom as f64)
        }
    } else if time.num == 0 {
        format!("{}{}", time.denom, SUSPECT)
    } else {
        format!("1/{:.0}", time.denom as f64 / time.num as f64)
    }
}

/// `f/2.8`; `None` when the denominator is zero.
pub fn format_f_number(f_number: Ratio) -> Option<String> {
    if f_number.denom == 0 {
        return None;
    }
    Some(format!("f/{:.1}", f_number.num as f64 / f_number.denom as f64))
}

/// Bias in EV to two decimals; `None` when the denominator is zero.
pub fn format_exposure_bias(bias: SignedRatio) -> Option<String> {
    if bias.denom == 0 {
        return None;
    }
    Some(format!("{:.2}", bias.num as f64 / bias.denom as f64))
}

pub fn exposure_program_name(code: u16) -> &'static str {
    match code {
        0 => "Not defined",
        1 => "Manual",
        2 => "Normal program",
        3 => "Aperture priority",
        4 => "Shutter priority",
        5 => "Creative program",
        6 => "Action program",
        7 => "Portrait mode",
        8 => "Landscape mode",
        _ => "Other",
    }
}

pub fn metering_mode_name(code: u16) -> &'static str {
    match code {
        0 => "unknown",
        1 => "Average",
        2 => "CenterWeightedAverage",
        3 => "Spot",
        4 => "MultiSpot",
        5 => "Pattern",
        6 => "Partial",
        255 => "other",
        _ => "reserved",
    }
}

/// Text up to the first NUL; fixed-size EXIF buffers are often zero padded.
fn until_nul(text: &str) -> &str {
    text.split('\0').next().unwrap_or(text)
}
