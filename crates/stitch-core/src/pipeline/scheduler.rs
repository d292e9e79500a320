//! Row job construction and parallel dispatch.
//!
//! Rendering is CPU-bound, so each job runs on tokio's blocking pool. A
//! semaphore caps how many run at once.

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::processor::render_job;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{CompositeJob, FailedJob, JobOutcome, ModelGroup, RenderParams, RunSummary};

/// Signature of the per-job worker.
pub type JobFn = fn(&CompositeJob) -> PipelineResult<()>;

/// Builds one job per row and runs them on a bounded worker pool.
pub struct JobScheduler {
    workers: usize,
}

impl JobScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// One job per row index, inputs in model order.
    ///
    /// With shuffle on, each row gets its own random model order, which
    /// also decides the output filename.
    pub fn build_jobs<R: Rng + ?Sized>(
        groups: &[ModelGroup],
        params: Arc<RenderParams>,
        output_dir: &Path,
        rng: &mut R,
    ) -> Vec<CompositeJob> {
        let rows = groups.first().map(ModelGroup::len).unwrap_or(0);
        (0..rows)
            .map(|row| {
                let mut order: Vec<&ModelGroup> = groups.iter().collect();
                if params.shuffle {
                    order.shuffle(&mut *rng);
                }
                let inputs = order.iter().map(|g| g.dir.join(&g.files[row])).collect();
                let names: Vec<&str> = order.iter().map(|g| g.name.as_str()).collect();
                CompositeJob {
                    row,
                    inputs,
                    output: output_dir.join(format!("{}-{}.jpg", names.join("-"), row + 1)),
                    params: Arc::clone(&params),
                }
            })
            .collect()
    }

    /// Render every job; returns once all have finished.
    pub async fn run<F>(&self, jobs: Vec<CompositeJob>, on_finished: F) -> RunSummary
    where
        F: FnMut(&JobOutcome),
    {
        self.run_with(jobs, render_job, on_finished).await
    }

    /// Run `jobs` through `worker`. A failing or panicking job is recorded in
    /// the summary and never stops its siblings.
    pub async fn run_with<F>(&self, jobs: Vec<CompositeJob>, worker: JobFn, mut on_finished: F) -> RunSummary
    where
        F: FnMut(&JobOutcome),
    {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut set = JoinSet::new();
        tracing::debug!("Dispatching {} job(s) on {} worker(s)", jobs.len(), self.workers);

        for job in jobs {
            let semaphore = Arc::clone(&semaphore);
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let row = job.row;
                let output = job.output.clone();
                let result = match tokio::task::spawn_blocking(move || worker(&job)).await {
                    Ok(result) => result,
                    Err(e) => Err(PipelineError::Worker {
                        path: output.clone(),
                        message: e.to_string(),
                    }),
                };
                JobOutcome { row, output, result }
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => {
                    on_finished(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => tracing::error!("Job task failed: {}", e),
            }
        }
        outcomes.sort_by_key(|o| o.row);

        let mut summary = RunSummary {
            rows: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.result {
                Ok(()) => summary.written.push(outcome.output),
                Err(e) => {
                    tracing::error!("Failed to render {:?}: {}", outcome.output, e);
                    summary.failed.push(FailedJob {
                        output: outcome.output,
                        error: e.to_string(),
                    });
                }
            }
        }
        summary.elapsed = start.elapsed();
        summary
    }
}
