//! Stitch Core - side-by-side comparison montages for camera test shots.
//!
//! Point Stitch at a directory holding one subdirectory per camera "model",
//! each with the same number of photos. For every row index it writes one
//! JPEG with the models' photos next to each other, optionally annotated
//! with a luminance histogram and the camera's EXIF settings.
//!
//! # Architecture
//!
//! ```text
//! Scan models → Match counts → Build row jobs → (per row, in parallel)
//!     Decode → sRGB → Orient → Scale/Crop → Histogram + EXIF text → Strip → JPEG
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use stitch_core::{Config, Stitcher};
//!
//! #[tokio::main]
//! async fn main() -> stitch_core::Result<()> {
//!     let stitcher = Stitcher::new(Config::load()?)?;
//!     let summary = stitcher.run("./shootout".as_ref(), |_| {}).await?;
//!     println!("Wrote {} composites", summary.written.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod fonts;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, FontError, PipelineError, PipelineResult, Result, StitchError};
pub use fonts::FontSet;
pub use pipeline::{GroupMatcher, JobScheduler};
pub use types::{CompositeJob, JobOutcome, Metadata, ModelGroup, RenderParams, RunSummary};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Montage runner - the main entry point.
pub struct Stitcher {
    config: Config,
    params: Arc<RenderParams>,
}

impl Stitcher {
    /// Load the configured font and prepare render parameters.
    pub fn new(config: Config) -> Result<Self> {
        let fonts = FontSet::load(
            &config.font_path(),
            config.font.small_size,
            config.font.medium_size,
        )?;
        Ok(Self::with_fonts(config, fonts))
    }

    /// Build a runner around already loaded fonts.
    pub fn with_fonts(config: Config, fonts: FontSet) -> Self {
        tracing::debug!("Initializing Stitch v{}", VERSION);
        let params = Arc::new(RenderParams::from_config(&config, fonts));
        Self { config, params }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render parameters shared by every job.
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Where composites for `root` are written.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.config.output.dir_name)
    }

    /// Find model directories under `root` and check their image counts match.
    pub fn scan(&self, root: &Path) -> Result<Vec<ModelGroup>> {
        Ok(GroupMatcher::new(&self.config).scan(root)?)
    }

    /// Scan `root` and render every row.
    pub async fn run<F>(&self, root: &Path, on_finished: F) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        let groups = self.scan(root)?;
        self.render(root, &groups, on_finished).await
    }

    /// Render already matched groups into a fresh output directory.
    ///
    /// Any previous output directory is removed first.
    pub async fn render<F>(&self, root: &Path, groups: &[ModelGroup], on_finished: F) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        let rows = GroupMatcher::check_counts(groups)?;
        let output_dir = self.output_dir(root);
        if output_dir.exists() {
            tracing::debug!("Removing previous output {:?}", output_dir);
            std::fs::remove_dir_all(&output_dir)?;
        }
        std::fs::create_dir_all(&output_dir)?;

        let jobs = {
            let mut rng = rand::thread_rng();
            JobScheduler::build_jobs(groups, Arc::clone(&self.params), &output_dir, &mut rng)
        };

        let scheduler = JobScheduler::new(self.config.worker_count());
        let mut summary = scheduler.run(jobs, on_finished).await;
        summary.models = groups.iter().map(|g| g.name.clone()).collect();
        summary.rows = rows;

        tracing::info!(
            "Finished: {} composite(s) written to {:?} in {:.1}s",
            summary.written.len(),
            output_dir,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }
}
