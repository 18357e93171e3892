//! Dynamic parallel Eclat.
//!
//! The recursion tree of the sequential search is flattened into jobs. A job
//! is one anchor together with the sibling array it is compared against. A
//! fixed pool of workers pulls jobs from a shared [`TaskQueue`], writes every
//! accepted extension to a shared result collector, and pushes one follow-up
//! job per accepted extension before marking its own job done. The
//! coordinator blocks until the outstanding count reaches zero, then shuts the
//! pool down and joins every worker.
//!
//! Jobs never overlap: each one extends a distinct item prefix, so the
//! collector needs no deduplication. Collection order depends on scheduling;
//! callers sort the output.

use std::any::Any;
use std::io;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::eclat::extend_prefix;
use super::queue::{DrainOutcome, TaskQueue};
use super::vector::ItemsetVector;
use crate::errors::{MiningError, MiningResult};
use crate::metrics::MiningMetrics;

const SHUTDOWN_ATTEMPTS: u32 = 5;
const SHUTDOWN_BACKOFF: Duration = Duration::from_millis(2);

/// One node of the recursion tree: `siblings[anchor]` combined with every
/// later sibling.
#[derive(Debug, Clone)]
struct ExpansionJob {
    siblings: Arc<[ItemsetVector]>,
    anchor: usize,
}

impl ExpansionJob {
    fn anchor(&self) -> &ItemsetVector {
        &self.siblings[self.anchor]
    }

    fn rest(&self) -> &[ItemsetVector] {
        &self.siblings[self.anchor + 1..]
    }

    /// One job per element of `siblings`.
    fn fan_out(siblings: Arc<[ItemsetVector]>) -> impl Iterator<Item = ExpansionJob> {
        (0..siblings.len()).map(move |anchor| ExpansionJob {
            siblings: Arc::clone(&siblings),
            anchor,
        })
    }
}

/// Accumulates accepted vectors from every worker.
#[derive(Debug, Default)]
struct ResultCollector {
    found: Mutex<Vec<ItemsetVector>>,
}

impl ResultCollector {
    fn extend(&self, vectors: &[ItemsetVector]) {
        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(vectors);
    }

    fn into_inner(self) -> Vec<ItemsetVector> {
        self.found
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Aborts the queue if its worker unwinds, so the coordinator never waits on
/// a job that will not finish.
struct PanicSentinel<'a> {
    queue: &'a TaskQueue<ExpansionJob>,
    worker: usize,
}

impl Drop for PanicSentinel<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.queue.abort(self.worker);
        }
    }
}

/// Runs the Eclat search across a fixed pool of worker threads
#[derive(Debug, Clone)]
pub struct ParallelScheduler {
    workers: NonZeroUsize,
    metrics: MiningMetrics,
}

impl ParallelScheduler {
    /// Creates a scheduler with `workers` threads
    pub fn new(workers: NonZeroUsize) -> Self {
        Self {
            workers,
            metrics: MiningMetrics::new(),
        }
    }

    /// Creates a scheduler sized to the host's available processors
    pub fn with_available_parallelism() -> Self {
        Self::new(NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN))
    }

    /// Reports into an existing metrics instance instead of a private one
    pub fn with_metrics(mut self, metrics: MiningMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    pub fn metrics(&self) -> &MiningMetrics {
        &self.metrics
    }

    /// Parallel counterpart of [`eclat`](super::eclat::eclat): same
    /// preconditions, same set of results.
    pub fn run(
        &self,
        base: &[ItemsetVector],
        min_support: usize,
    ) -> MiningResult<Vec<ItemsetVector>> {
        self.run_with(base, min_support, extend_prefix)
    }

    /// Runs the scheduler with a custom per-job expansion step.
    ///
    /// `expand(anchor, rest, min_support)` must return the accepted extensions
    /// of `anchor`, in the order of `rest`.
    pub fn run_with<F>(
        &self,
        base: &[ItemsetVector],
        min_support: usize,
        expand: F,
    ) -> MiningResult<Vec<ItemsetVector>>
    where
        F: Fn(&ItemsetVector, &[ItemsetVector], usize) -> Vec<ItemsetVector> + Sync,
    {
        if base.is_empty() {
            return Ok(Vec::new());
        }

        let queue = TaskQueue::new();
        let collector = ResultCollector::default();
        queue.push_all(ExpansionJob::fan_out(base.to_vec().into()));
        debug!(
            "Seeded {} jobs for {} workers",
            base.len(),
            self.workers.get()
        );

        let (queue_ref, collector_ref, expand_ref) = (&queue, &collector, &expand);
        thread::scope(|scope| -> MiningResult<()> {
            let mut handles = Vec::with_capacity(self.workers.get());
            for worker in 0..self.workers.get() {
                let metrics = self.metrics.clone();
                let spawned = thread::Builder::new()
                    .name(format!("itemscout-worker-{}", worker))
                    .spawn_scoped(scope, move || {
                        worker_loop(
                            worker,
                            queue_ref,
                            collector_ref,
                            expand_ref,
                            min_support,
                            &metrics,
                        )
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => return Err(abandon_run(queue_ref, handles, worker, source)),
                }
            }

            let outcome = queue_ref.wait_drained();
            shutdown(queue_ref, handles)?;
            match outcome {
                DrainOutcome::Drained => Ok(()),
                DrainOutcome::Aborted { worker } => Err(MiningError::worker_panicked(
                    worker,
                    "worker aborted the run",
                )),
            }
        })?;

        self.metrics.record_outstanding(queue.peak_outstanding());
        Ok(collector.into_inner())
    }
}

fn worker_loop<F>(
    worker: usize,
    queue: &TaskQueue<ExpansionJob>,
    collector: &ResultCollector,
    expand: &F,
    min_support: usize,
    metrics: &MiningMetrics,
) where
    F: Fn(&ItemsetVector, &[ItemsetVector], usize) -> Vec<ItemsetVector> + Sync,
{
    let _sentinel = PanicSentinel { queue, worker };
    let mut jobs = 0usize;

    while let Some(job) = queue.pop() {
        let extensions = expand(job.anchor(), job.rest(), min_support);
        metrics.record_job(job.rest().len(), extensions.len());

        if !extensions.is_empty() {
            collector.extend(&extensions);
            queue.push_all(ExpansionJob::fan_out(extensions.into()));
        }
        queue.task_done();
        jobs += 1;
    }

    trace!("Worker {} exiting after {} jobs", worker, jobs);
}

/// Closes the queue until every worker has observed it, then joins them all.
///
/// Every handle is joined even when an earlier one reports a panic, so no
/// worker outlives the run.
fn shutdown(
    queue: &TaskQueue<ExpansionJob>,
    handles: Vec<ScopedJoinHandle<'_, ()>>,
) -> MiningResult<()> {
    for attempt in 1..=SHUTDOWN_ATTEMPTS {
        queue.close();
        if handles.iter().all(|h| h.is_finished()) {
            break;
        }
        trace!("Waiting for workers to exit (attempt {})", attempt);
        thread::sleep(SHUTDOWN_BACKOFF * attempt);
    }

    let mut failure = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        if let Err(payload) = handle.join() {
            let message = panic_message(payload.as_ref());
            warn!("Worker {} panicked: {}", worker, message);
            failure.get_or_insert(MiningError::worker_panicked(worker, message));
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Stops the workers already running after `worker` failed to spawn.
///
/// The spawn failure is the reported error even if a running worker also
/// panicked.
fn abandon_run(
    queue: &TaskQueue<ExpansionJob>,
    handles: Vec<ScopedJoinHandle<'_, ()>>,
    worker: usize,
    source: io::Error,
) -> MiningError {
    warn!("Failed to spawn worker {}: {}", worker, source);
    queue.close();
    if let Err(err) = shutdown(queue, handles) {
        warn!("Worker failure while abandoning the run: {}", err);
    }
    MiningError::WorkerSpawn { worker, source }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
