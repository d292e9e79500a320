//! Sub-configuration structs with defaults matching the montage layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How each photo is fitted into its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Downscale to a common height, preserving aspect ratio
    #[default]
    Scale,
    /// Cut a fixed-size square from the centre
    Crop,
}

/// Filename ordering used inside model directories and for model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Digit runs compare numerically ("img2" before "img10")
    #[default]
    Natural,
    /// Plain code-point comparison
    Lexical,
}

/// Layout and annotation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scale or crop
    pub mode: RenderMode,

    /// Panel height in scale mode
    pub max_height: u32,

    /// Square side in crop mode
    pub crop_size: u32,

    /// Gap between panels in pixels
    pub divider_width: u32,

    /// Gap and background colour (RGB)
    pub divider_color: [u8; 3],

    /// Annotation text colour (RGB)
    pub font_color: [u8; 3],

    /// Overlay a luminance histogram on each panel
    pub show_histogram: bool,

    /// Overlay file name, size and EXIF summary on each panel
    pub show_file_info: bool,

    /// Randomize panel order per row (hides histogram and file info)
    pub shuffle: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Scale,
            max_height: 1080,
            crop_size: 800,
            divider_width: 3,
            divider_color: [0, 0, 0],
            font_color: [0, 255, 0],
            show_histogram: true,
            show_file_info: true,
            shuffle: false,
        }
    }
}

/// Font settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType/OpenType font file
    pub path: PathBuf,

    /// Pixel size for histogram axis labels
    pub small_size: f32,

    /// Pixel size for file info and placeholder text
    pub medium_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.stitch/SourceHanSansHWSC-Regular.otf"),
            small_size: 12.0,
            medium_size: 16.0,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel workers (0 = one per available CPU)
    pub parallel_workers: usize,

    /// Supported input formats
    pub supported_formats: Vec<String>,

    /// Filename ordering
    pub sort: SortOrder,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 0,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
                "png".to_string(),
            ],
            sort: SortOrder::Natural,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Name of the results directory created inside the input directory
    pub dir_name: String,

    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_name: "Results".to_string(),
            quality: 95,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
