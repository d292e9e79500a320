//! Montage pipeline components.
//!
//! Per photo:
//! - **decode**: Read and decode with format sniffing, keep the ICC profile
//! - **metadata**: Extract the EXIF fields the annotation shows
//! - **color**: Convert embedded-profile pixels to sRGB
//! - **preprocess**: Decode, colour-correct and orient, or fall back to a placeholder
//! - **normalize**: Scale to a common height or crop a centred square
//! - **histogram**: Luminance histogram panel
//! - **annotate**: File info and EXIF text block
//!
//! Per row and per run:
//! - **compose**: Paste panels onto the divider-coloured strip and write the JPEG
//! - **ordering**: Natural and lexical name comparators
//! - **discovery**: Find model directories and match their image sets
//! - **scheduler**: Build row jobs and run them on a bounded worker pool
//! - **processor**: Render one row end to end

pub mod annotate;
pub mod color;
pub mod compose;
pub mod decode;
pub mod discovery;
pub mod histogram;
pub mod metadata;
pub mod normalize;
pub mod ordering;
pub mod preprocess;
pub mod processor;
pub mod scheduler;

// Re-exports for convenient access
pub use annotate::{ExifAnnotator, FileInfo};
pub use color::ColorConverter;
pub use compose::Compositor;
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::GroupMatcher;
pub use histogram::HistogramRenderer;
pub use metadata::MetadataExtractor;
pub use normalize::FrameNormalizer;
pub use ordering::{comparator_for, LexicalComparator, NaturalComparator, StringComparator};
pub use preprocess::{ImagePreprocessor, PreparedImage};
pub use processor::render_job;
pub use scheduler::JobScheduler;
