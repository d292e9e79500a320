//! The `stitch run` command: build montages for a directory of model folders.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use stitch_core::config::RenderMode;
use stitch_core::{Config, JobOutcome, RunSummary, Stitcher};

use super::expand_path;

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory holding one subdirectory per camera model
    #[arg(required = true)]
    pub input: PathBuf,

    /// Number of rows rendered in parallel (0 = one per CPU)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// How photos are fitted into their panels
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Panel height in scale mode
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Square side in crop mode
    #[arg(long)]
    pub crop_size: Option<u32>,

    /// Randomize model order per row and hide all overlays
    #[arg(long)]
    pub shuffle: bool,

    /// Don't draw luminance histograms
    #[arg(long)]
    pub no_histogram: bool,

    /// Don't draw file info and EXIF text
    #[arg(long)]
    pub no_file_info: bool,

    /// Font file for overlay text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Panel fitting mode.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// Downscale to a common height
    Scale,
    /// Centered square crop
    Crop,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Scale => RenderMode::Scale,
            Mode::Crop => RenderMode::Crop,
        }
    }
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.processing.parallel_workers = workers;
        }
        if let Some(mode) = self.mode {
            config.render.mode = mode.into();
        }
        if let Some(max_height) = self.max_height {
            config.render.max_height = max_height;
        }
        if let Some(crop_size) = self.crop_size {
            config.render.crop_size = crop_size;
        }
        if self.shuffle {
            config.render.shuffle = true;
        }
        if self.no_histogram {
            config.render.show_histogram = false;
        }
        if self.no_file_info {
            config.render.show_file_info = false;
        }
        if let Some(font) = &self.font {
            config.font.path = expand_path(font);
        }
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    let input = expand_path(&args.input);
    if !input.is_dir() {
        anyhow::bail!("Input is not a directory: {}", input.display());
    }

    args.apply_overrides(&mut config);
    config.validate()?;

    let stitcher = Stitcher::new(config)
        .context("Failed to load the overlay font (set [font] path or pass --font)")?;

    let groups = stitcher.scan(&input)?;
    let rows = groups.first().map(|g| g.len()).unwrap_or(0);
    tracing::info!(
        "Rendering {} row(s) across {} model(s) with {} worker(s)",
        rows,
        groups.len(),
        stitcher.config().worker_count()
    );

    let progress = create_progress_bar(rows as u64);
    let summary = stitcher
        .render(&input, &groups, |outcome: &JobOutcome| {
            if let Some(name) = outcome.output.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }
            progress.inc(1);
        })
        .await?;
    progress.finish_with_message("done");

    print_summary(&summary, &stitcher.output_dir(&input));

    if let Some(report) = &args.report {
        let report = expand_path(report);
        std::fs::write(&report, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("Failed to write report to {}", report.display()))?;
        tracing::info!("Report written to {}", report.display());
    }

    summary.ensure_success()?;
    Ok(())
}

/// Create a progress bar with one step per row.
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the run.
fn print_summary(summary: &RunSummary, output_dir: &std::path::Path) {
    let elapsed = summary.elapsed.as_secs_f64();
    let rate = if elapsed > 0.0 {
        summary.written.len() as f64 / elapsed
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Models:       {:>8}", summary.models.len());
    eprintln!("    Written:      {:>8}", summary.written.len());
    if !summary.failed.is_empty() {
        eprintln!("    Failed:       {:>8}", summary.failed.len());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Rows:         {:>8}", summary.rows);
    eprintln!("    Duration:     {:>7.1}s", elapsed);
    eprintln!("    Rate:         {:>7.1} rows/sec", rate);
    eprintln!("  ====================================");
    eprintln!("    Output: {}", output_dir.display());
    for failed in &summary.failed {
        eprintln!("    FAILED {}: {}", failed.output.display(), failed.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        config.render.max_height = 720;
        RunArgs::default().apply_overrides(&mut config);

        assert_eq!(config.render.max_height, 720);
        assert!(config.render.show_histogram);
        assert!(!config.render.shuffle);
        assert_eq!(config.processing.parallel_workers, 0);
    }

    #[test]
    fn test_flags_override_config() {
        let args = RunArgs {
            workers: Some(3),
            mode: Some(Mode::Crop),
            crop_size: Some(400),
            shuffle: true,
            no_file_info: true,
            font: Some(PathBuf::from("/fonts/Mono.ttf")),
            ..Default::default()
        };
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.processing.parallel_workers, 3);
        assert_eq!(config.render.mode, RenderMode::Crop);
        assert_eq!(config.render.crop_size, 400);
        assert!(config.render.shuffle);
        assert!(config.render.show_histogram);
        assert!(!config.render.show_file_info);
        assert_eq!(config.font.path, PathBuf::from("/fonts/Mono.ttf"));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let args = RunArgs {
            max_height: Some(0),
            ..Default::default()
        };
        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_missing_input_directory() {
        let args = RunArgs {
            input: PathBuf::from("/nonexistent/shootout"),
            ..Default::default()
        };
        let err = execute(args, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
