//! Blocking task queue that counts outstanding work.
//!
//! A job is outstanding from the moment it is pushed until the worker that
//! pulled it calls [`TaskQueue::task_done`]. Workers push follow-up jobs
//! *before* marking their own job done, so the outstanding count can only
//! reach zero once the whole recursion tree has been processed.
//!
//! | Operation       | Blocking                                  |
//! |-----------------|-------------------------------------------|
//! | `push`          | never                                     |
//! | `pop`           | while empty and open                      |
//! | `task_done`     | never                                     |
//! | `wait_drained`  | while jobs are outstanding and not aborted |

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct QueueState<T> {
    pending: VecDeque<T>,
    /// Pushed but not yet marked done.
    outstanding: usize,
    peak_outstanding: usize,
    closed: bool,
    /// Worker that aborted the queue, if any.
    aborted_by: Option<usize>,
}

/// How a wait on the queue ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every submitted job finished.
    Drained,
    /// A worker aborted the run before the queue drained.
    Aborted { worker: usize },
}

/// Multi-producer, multi-consumer job queue with completion tracking.
///
/// Safe to share by reference across scoped worker threads.
#[derive(Debug)]
pub struct TaskQueue<T> {
    state: Mutex<QueueState<T>>,
    /// Signalled when a job is pushed or the queue closes.
    available: Condvar,
    /// Signalled when the outstanding count reaches zero or the queue aborts.
    drained: Condvar,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                outstanding: 0,
                peak_outstanding: 0,
                closed: false,
                aborted_by: None,
            }),
            available: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Lock state with poison recovery. No caller code runs under the lock,
    /// so the state is consistent even after a panic elsewhere.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits one job.
    pub fn push(&self, job: T) {
        let mut st = self.lock();
        st.pending.push_back(job);
        st.outstanding += 1;
        st.peak_outstanding = st.peak_outstanding.max(st.outstanding);
        drop(st);
        self.available.notify_one();
    }

    /// Submits a batch of jobs under a single lock acquisition.
    pub fn push_all(&self, jobs: impl IntoIterator<Item = T>) {
        let mut st = self.lock();
        let before = st.pending.len();
        st.pending.extend(jobs);
        let added = st.pending.len() - before;
        if added == 0 {
            return;
        }
        st.outstanding += added;
        st.peak_outstanding = st.peak_outstanding.max(st.outstanding);
        drop(st);
        if added == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }

    /// Pulls the next job, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and empty, or immediately after
    /// an abort.
    pub fn pop(&self) -> Option<T> {
        let mut st = self.lock();
        loop {
            if st.aborted_by.is_some() {
                return None;
            }
            if let Some(job) = st.pending.pop_front() {
                return Some(job);
            }
            if st.closed {
                return None;
            }
            st = self
                .available
                .wait(st)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks one previously pulled job as finished.
    pub fn task_done(&self) {
        let mut st = self.lock();
        debug_assert!(st.outstanding > 0, "task_done called more times than push");
        st.outstanding = st.outstanding.saturating_sub(1);
        let finished = st.outstanding == 0;
        drop(st);
        if finished {
            self.drained.notify_all();
        }
    }

    /// Blocks until every submitted job is done or the queue is aborted.
    pub fn wait_drained(&self) -> DrainOutcome {
        let mut st = self.lock();
        loop {
            if let Some(worker) = st.aborted_by {
                return DrainOutcome::Aborted { worker };
            }
            if st.outstanding == 0 {
                return DrainOutcome::Drained;
            }
            st = self
                .drained
                .wait(st)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Closes the queue. Blocked and future `pop` calls return `None` once the
    /// pending list is empty. Idempotent.
    pub fn close(&self) {
        let mut st = self.lock();
        st.closed = true;
        drop(st);
        self.available.notify_all();
    }

    /// Fails the run on behalf of `worker`, waking every waiter.
    pub fn abort(&self, worker: usize) {
        let mut st = self.lock();
        st.aborted_by.get_or_insert(worker);
        st.closed = true;
        drop(st);
        self.available.notify_all();
        self.drained.notify_all();
    }

    /// Jobs pushed but not yet marked done.
    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Highest outstanding count observed.
    pub fn peak_outstanding(&self) -> usize {
        self.lock().peak_outstanding
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
