use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks search effort across the coordinator and its workers
#[derive(Debug, Clone)]
pub struct MiningMetrics {
    // Search effort
    jobs_processed: Arc<AtomicU64>,
    candidates_evaluated: Arc<AtomicU64>,
    itemsets_accepted: Arc<AtomicU64>,

    // Queue pressure
    peak_outstanding: Arc<AtomicU64>,
}

impl MiningMetrics {
    /// Creates a new MiningMetrics instance
    pub fn new() -> Self {
        Self {
            jobs_processed: Arc::new(AtomicU64::new(0)),
            candidates_evaluated: Arc::new(AtomicU64::new(0)),
            itemsets_accepted: Arc::new(AtomicU64::new(0)),
            peak_outstanding: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one processed expansion job
    pub fn record_job(&self, candidates: usize, accepted: usize) {
        let jobs = self.jobs_processed.fetch_add(1, Ordering::Relaxed) + 1;
        self.candidates_evaluated
            .fetch_add(candidates as u64, Ordering::Relaxed);
        self.itemsets_accepted
            .fetch_add(accepted as u64, Ordering::Relaxed);
        if jobs % 10_000 == 0 {
            debug!("Processed {} expansion jobs", jobs);
        }
    }

    /// Records itemsets accepted outside of a job (e.g. by the sequential search)
    pub fn record_accepted(&self, accepted: usize) {
        self.itemsets_accepted
            .fetch_add(accepted as u64, Ordering::Relaxed);
    }

    /// Records the current number of outstanding jobs, keeping the maximum
    pub fn record_outstanding(&self, outstanding: usize) {
        let outstanding = outstanding as u64;
        let mut peak = self.peak_outstanding.load(Ordering::Relaxed);
        while outstanding > peak {
            match self.peak_outstanding.compare_exchange_weak(
                peak,
                outstanding,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => peak = current,
            }
        }
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> MiningStats {
        MiningStats {
            jobs_processed: self.jobs_processed.load(Ordering::Relaxed),
            candidates_evaluated: self.candidates_evaluated.load(Ordering::Relaxed),
            itemsets_accepted: self.itemsets_accepted.load(Ordering::Relaxed),
            peak_outstanding: self.peak_outstanding.load(Ordering::Relaxed),
        }
    }

    /// Logs the counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Mining stats:\n\
             Jobs processed: {}\n\
             Candidate pairs evaluated: {}\n\
             Itemsets accepted: {}\n\
             Peak outstanding jobs: {}",
            stats.jobs_processed,
            stats.candidates_evaluated,
            stats.itemsets_accepted,
            stats.peak_outstanding
        );
    }
}

impl Default for MiningMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`MiningMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningStats {
    pub jobs_processed: u64,
    pub candidates_evaluated: u64,
    pub itemsets_accepted: u64,
    pub peak_outstanding: u64,
}
