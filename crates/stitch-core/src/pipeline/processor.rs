//! Single-row rendering: wires the per-photo stages into one composite.

use std::time::Instant;

use super::compose::Compositor;
use super::preprocess::{ImagePreprocessor, PreparedImage};
use crate::error::PipelineResult;
use crate::types::CompositeJob;

/// Render one composite job and write its JPEG.
///
/// Unreadable inputs become placeholder panels; only encoding and writing
/// the output can fail.
pub fn render_job(job: &CompositeJob) -> PipelineResult<()> {
    let start = Instant::now();
    let params = job.params.as_ref();
    tracing::debug!("Rendering row {} -> {:?}", job.row + 1, job.output);

    let prepared: Vec<PreparedImage> = job
        .inputs
        .iter()
        .map(|path| ImagePreprocessor::load(path, params))
        .collect();
    let placeholders = prepared.iter().filter(|p| p.is_placeholder).count();
    tracing::trace!("  Load: {:?}", start.elapsed());

    let compose_start = Instant::now();
    let compositor = Compositor::new(params);
    let canvas = compositor.compose(&prepared);
    tracing::trace!("  Compose: {:?}", compose_start.elapsed());

    let write_start = Instant::now();
    compositor.write_jpeg(&canvas, &job.output)?;
    tracing::trace!("  Write: {:?}", write_start.elapsed());

    tracing::debug!(
        "Rendered {:?} in {:?} ({}x{}, {} placeholder(s))",
        job.output,
        start.elapsed(),
        canvas.width(),
        canvas.height(),
        placeholders
    );
    Ok(())
}
