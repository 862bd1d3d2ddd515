//! Bounded worker pool for image encoding.
//!
//! One gallery's batch at a time: jobs go into a shared queue, a fixed set
//! of worker threads drains it, and results stream back over a channel in
//! completion order. The concurrency contract is explicit — bounded
//! parallelism, per-job failure isolation, streamed completion — rather
//! than delegated to a runtime-managed executor.
//!
//! Each job is one source image and runs the whole chain itself: staleness
//! gate → identify → plan → render. Encoding blocks on CPU and I/O alike,
//! which is exactly why the pool exists; a `--jobs` limit of `0` means "use
//! host parallelism" and `1` gives strictly sequential, deterministic runs.
//!
//! A failed job reports a [`JobOutcome::Failed`] and its workers move on;
//! nothing is cancelled. [`process_batch`] returns only after every worker
//! has finished, so callers can treat its return as the batch barrier
//! (manifests are written after, never on partial results).

use crate::discover::SourceImage;
use crate::gate::{self, Freshness};
use crate::imaging::{ImageBackend, Quality, plan_render};
use crate::manifest::ImageRecord;
use crate::settings::SizeClass;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, mpsc};
use std::thread;

/// One unit of work: a source image plus the manifest record carried over
/// from the previous build, if any.
#[derive(Debug)]
pub struct EncodeJob {
    pub source: SourceImage,
    pub retained: Option<ImageRecord>,
}

/// Batch-wide parameters shared by every job of one gallery.
#[derive(Debug, Clone, Copy)]
pub struct BatchContext<'a> {
    /// Gallery output directory (parent of the size-class directories).
    pub output_dir: &'a Path,
    pub classes: &'a [SizeClass],
    pub quality: Quality,
    /// Disable the incremental gate: re-encode everything.
    pub force: bool,
}

/// Terminal state of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Re-encoded; fresh record from the source's actual dimensions.
    Processed(ImageRecord),
    /// Outputs were fresh; record carried over from the previous manifest.
    Skipped(ImageRecord),
    /// Decode/encode/write failure. The message is for the build log; the
    /// image id travels with the result.
    Failed(String),
}

/// A completed job, streamed back in completion order.
#[derive(Debug)]
pub struct JobResult {
    pub source: SourceImage,
    pub outcome: JobOutcome,
}

/// Resolve a `--jobs` limit: `0` means host parallelism.
pub fn effective_workers(limit: usize) -> usize {
    if limit > 0 {
        return limit;
    }
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Run one gallery's jobs on up to `limit` workers (0 = host parallelism).
///
/// `on_result` fires on the calling thread as each job completes —
/// completion order, not submission order. Returns all results after the
/// pool drains.
pub fn process_batch<B, F>(
    backend: &B,
    ctx: &BatchContext<'_>,
    jobs: Vec<EncodeJob>,
    limit: usize,
    mut on_result: F,
) -> Vec<JobResult>
where
    B: ImageBackend,
    F: FnMut(&JobResult),
{
    let job_count = jobs.len();
    if job_count == 0 {
        return Vec::new();
    }

    let workers = effective_workers(limit).min(job_count);
    let queue = Mutex::new(VecDeque::from(jobs));
    let mut results = Vec::with_capacity(job_count);

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();

        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            scope.spawn(move || {
                loop {
                    let job = {
                        // A poisoned lock means a sibling worker panicked;
                        // stop draining rather than propagate.
                        let Ok(mut queue) = queue.lock() else { break };
                        queue.pop_front()
                    };
                    let Some(job) = job else { break };

                    let outcome = run_job(backend, ctx, &job);
                    if tx
                        .send(JobResult {
                            source: job.source,
                            outcome,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for result in rx {
            on_result(&result);
            results.push(result);
        }
    });

    results
}

/// Run a single job: gate, identify, plan, render.
fn run_job<B: ImageBackend>(backend: &B, ctx: &BatchContext<'_>, job: &EncodeJob) -> JobOutcome {
    let outputs = gate::expected_outputs(ctx.output_dir, &job.source.id, ctx.classes);

    // Only a job with a carried-over record can skip: fresh outputs without
    // a manifest record must re-encode so the rewritten manifest stays
    // complete.
    if let Some(record) = &job.retained {
        match gate::check(&job.source.path, &outputs, ctx.force) {
            Ok(Freshness::Fresh) => return JobOutcome::Skipped(record.clone()),
            Ok(Freshness::Stale) => {}
            Err(e) => return JobOutcome::Failed(e.to_string()),
        }
    }

    let dims = match backend.identify(&job.source.path) {
        Ok(dims) => dims,
        Err(e) => return JobOutcome::Failed(e.to_string()),
    };

    let params = plan_render(
        &job.source.path,
        ctx.output_dir,
        &job.source.id,
        (dims.width, dims.height),
        ctx.classes,
        ctx.quality,
    );

    match backend.render(&params) {
        Ok(()) => JobOutcome::Processed(ImageRecord::new(
            job.source.id.clone(),
            dims.width,
            dims.height,
        )),
        Err(e) => JobOutcome::Failed(e.to_string()),
    }
}
