//! Core data types for the Stitch montage pipeline.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, RenderMode};
use crate::error::PipelineError;
use crate::fonts::FontSet;

/// Unsigned EXIF rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub num: u32,
    pub denom: u32,
}

impl Ratio {
    pub fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }
}

/// Signed EXIF rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedRatio {
    pub num: i32,
    pub denom: i32,
}

impl SignedRatio {
    pub fn new(num: i32, denom: i32) -> Self {
        Self { num, denom }
    }
}

/// The camera metadata fields the annotation consumes.
///
/// String fields keep whatever the camera wrote, including trailing NUL
/// padding; consumers truncate at the first NUL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// DateTime (0x0132)
    pub date_time: Option<String>,
    /// ExposureTime (0x829A)
    pub exposure_time: Option<Ratio>,
    /// FNumber (0x829D)
    pub f_number: Option<Ratio>,
    /// PhotographicSensitivity / ISO (0x8827)
    pub iso: Option<u32>,
    /// ImageDescription (0x010E)
    pub image_description: Option<String>,
    /// Make (0x010F)
    pub make: Option<String>,
    /// Model (0x0110)
    pub model: Option<String>,
    /// ExposureProgram (0x8822)
    pub exposure_program: Option<u16>,
    /// ExposureBiasValue (0x9204)
    pub exposure_bias: Option<SignedRatio>,
    /// MeteringMode (0x9207)
    pub metering_mode: Option<u16>,
    /// Flash (0x9209)
    pub flash: Option<u16>,
    /// Orientation (0x0112)
    pub orientation: Option<u16>,
    /// Description of the embedded ICC profile the pixels were converted from
    pub color_space: Option<String>,
}

/// Immutable rendering settings shared by every job of a run.
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub mode: RenderMode,
    pub max_height: u32,
    pub crop_size: u32,
    pub divider_width: u32,
    pub divider_color: Rgb<u8>,
    pub font_color: Rgb<u8>,
    pub show_histogram: bool,
    pub show_file_info: bool,
    pub shuffle: bool,
    pub jpeg_quality: u8,
    pub fonts: FontSet,
}

impl RenderParams {
    /// Build render parameters from configuration.
    ///
    /// Shuffle mode hides histogram and file info so panels can't be told apart.
    pub fn from_config(config: &Config, fonts: FontSet) -> Self {
        let render = &config.render;
        Self {
            mode: render.mode,
            max_height: render.max_height,
            crop_size: render.crop_size,
            divider_width: render.divider_width,
            divider_color: Rgb(render.divider_color),
            font_color: Rgb(render.font_color),
            show_histogram: render.show_histogram && !render.shuffle,
            show_file_info: render.show_file_info && !render.shuffle,
            shuffle: render.shuffle,
            jpeg_quality: config.output.quality,
            fonts,
        }
    }
}

/// One model directory and its ordered image filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGroup {
    /// Directory name, used in output filenames
    pub name: String,
    /// Full path to the directory
    pub dir: PathBuf,
    /// Image filenames in display order
    pub files: Vec<String>,
}

impl ModelGroup {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One output row: one input per model, left to right.
#[derive(Debug, Clone)]
pub struct CompositeJob {
    /// Zero-based row index
    pub row: usize,
    /// Input images in panel order
    pub inputs: Vec<PathBuf>,
    /// Destination JPEG
    pub output: PathBuf,
    pub params: Arc<RenderParams>,
}

/// Result of running one composite job.
#[derive(Debug)]
pub struct JobOutcome {
    pub row: usize,
    pub output: PathBuf,
    pub result: Result<(), PipelineError>,
}

/// A composite that could not be produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedJob {
    pub output: PathBuf,
    pub error: String,
}

/// Summary of a full run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Model names in sorted order
    pub models: Vec<String>,
    /// Number of rows (images per model)
    pub rows: usize,
    /// Composites written, in row order
    pub written: Vec<PathBuf>,
    /// Composites that failed
    pub failed: Vec<FailedJob>,
    /// Wall-clock time spent rendering
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    /// Turn failed jobs into a single error listing every failed output.
    pub fn ensure_success(&self) -> Result<(), PipelineError> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::JobsFailed {
                failed: self.failed.iter().map(|f| f.output.clone()).collect(),
            })
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}
