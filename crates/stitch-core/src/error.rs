//! Error types for the Stitch montage pipeline.
//!
//! Errors are organized by stage to provide clear, actionable error messages
//! that include relevant context (file paths, model names, specific issues).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Stitch operations.
#[derive(Error, Debug)]
pub enum StitchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Font loading errors
    #[error("Font error: {0}")]
    Font(#[from] FontError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Font loading errors.
#[derive(Error, Debug)]
pub enum FontError {
    /// The font file could not be read
    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The font file is not a usable TrueType/OpenType font
    #[error("Invalid font data in {path}")]
    Invalid { path: PathBuf },
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// ICC profile could not be applied
    #[error("Colour transform failed for {path}: {message}")]
    ColorTransform { path: PathBuf, message: String },

    /// Composite could not be encoded
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Composite could not be written to disk
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model directories hold different numbers of images
    #[error("Image counts differ between model directories ({}). Please check your images.", format_counts(.counts))]
    GroupCountMismatch { counts: Vec<(String, usize)> },

    /// The input directory has no model subdirectories
    #[error("No model directories found in {0}")]
    NoModelGroups(PathBuf),

    /// A worker task panicked or was cancelled
    #[error("Worker failed while rendering {path}: {message}")]
    Worker { path: PathBuf, message: String },

    /// One or more composite jobs failed
    #[error("{} composite(s) failed: {}", .failed.len(), format_paths(.failed))]
    JobsFailed { failed: Vec<PathBuf> },
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(model, count)| format!("{model}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience type alias for Stitch results.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
