//! The upload pool: bounded queue, fixed worker set, lifecycle.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use presswork_core::upload::validate_file_name;

use crate::job::{SourceStream, UploadError, UploadJob, UploadOutcome};
use crate::worker::run_worker;

/// Sizing and timing for an [`UploadPool`]. Fixed at construction; the
/// pool is never resized at runtime.
#[derive(Debug, Clone)]
pub struct UploadPoolConfig {
    /// Number of worker tasks. Values below 1 are clamped to 1; a pool
    /// with no workers could never produce an outcome.
    pub worker_count: usize,
    /// Bounded queue capacity. Jobs beyond `worker_count + queue_capacity`
    /// in flight are rejected. Clamped to at least 1: a zero-capacity
    /// bounded channel is not representable in tokio.
    pub queue_capacity: usize,
    /// Upper bound on how long [`UploadPool::submit_and_wait`] waits for a
    /// worker's reply.
    pub reply_timeout: Duration,
}

impl Default for UploadPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            queue_capacity: 48,
            reply_timeout: Duration::from_secs(30),
        }
    }
}

/// Why a non-blocking submission was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Queue at capacity. The job is dropped; its reply channel closes, so
    /// a waiter on the receiver observes the rejection as a closed channel.
    #[error("upload queue is full")]
    QueueFull,

    /// The pool has been shut down.
    #[error("upload pool is closed")]
    Closed,
}

/// Fixed-size pool of upload workers sharing one bounded job queue.
///
/// Constructed once at startup via [`UploadPool::start`] and shared as
/// `Arc<UploadPool>`. The queue is constructor-injected into every worker;
/// nothing here is ambient or global.
pub struct UploadPool {
    /// `None` after shutdown -- dropping the sender is the "no more jobs"
    /// signal that lets workers drain and stop.
    queue: RwLock<Option<mpsc::Sender<UploadJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    reply_timeout: Duration,
}

impl UploadPool {
    /// Create the queue and spawn exactly `config.worker_count` workers.
    pub fn start(config: UploadPoolConfig) -> Arc<Self> {
        let capacity = config.queue_capacity.max(1);
        let (tx, rx) = mpsc::channel::<UploadJob>(capacity);
        let rx = Arc::new(Mutex::new(rx));

        let workers = (0..config.worker_count.max(1))
            .map(|id| tokio::spawn(run_worker(id + 1, Arc::clone(&rx))))
            .collect();

        tracing::info!(
            worker_count = config.worker_count.max(1),
            queue_capacity = capacity,
            "Upload pool started",
        );

        Arc::new(Self {
            queue: RwLock::new(Some(tx)),
            workers: Mutex::new(workers),
            reply_timeout: config.reply_timeout,
        })
    }

    /// Attempt to enqueue a job without blocking.
    ///
    /// Returns immediately with [`SubmitError::QueueFull`] when the queue
    /// is at capacity. On success, ownership of the job transfers to
    /// whichever worker dequeues it.
    pub fn try_submit(&self, job: UploadJob) -> Result<(), SubmitError> {
        let sender = {
            let guard = self.queue.read().expect("queue lock poisoned");
            match guard.as_ref() {
                Some(sender) => sender.clone(),
                None => return Err(SubmitError::Closed),
            }
        };

        match sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => {
                tracing::debug!(
                    declared_name = %job.declared_name,
                    "Upload queue full, rejecting job",
                );
                Err(SubmitError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(SubmitError::Closed),
        }
    }

    /// Submit one file and wait (bounded) for its outcome.
    ///
    /// Validates the declared name, builds the job with a fresh reply
    /// channel, try-submits, and awaits the reply up to the configured
    /// deadline. A worker replying after the deadline hits a dropped
    /// receiver; the send is discarded without blocking the worker.
    pub async fn submit_and_wait(
        &self,
        source: SourceStream,
        dest_dir: PathBuf,
        declared_name: String,
    ) -> UploadOutcome {
        validate_file_name(&declared_name)
            .map_err(|e| UploadError::InvalidName(e.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let job = UploadJob {
            source,
            dest_dir,
            declared_name,
            reply: reply_tx,
        };

        self.try_submit(job).map_err(|e| match e {
            SubmitError::QueueFull => UploadError::QueueFull,
            SubmitError::Closed => UploadError::PoolClosed,
        })?;

        match tokio::time::timeout(self.reply_timeout, reply_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(UploadError::ReplyDropped),
            Err(_) => Err(UploadError::ReplyTimeout),
        }
    }

    /// Stop accepting jobs, drain the backlog, and join all workers.
    ///
    /// Jobs already accepted are still processed and replied to; only new
    /// submissions fail (with [`SubmitError::Closed`]). Idempotent, and
    /// every caller -- including concurrent ones -- returns only after the
    /// drain has completed.
    pub async fn shutdown(&self) {
        let closed = self
            .queue
            .write()
            .expect("queue lock poisoned")
            .take()
            .is_some();
        if closed {
            tracing::info!("Upload pool draining");
        }

        // Joining happens under the lock so a concurrent shutdown call
        // blocks here until the first caller has finished the drain.
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            // A worker panic is already a bug; don't let it poison shutdown.
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Upload worker task failed");
            }
        }

        if closed {
            tracing::info!("Upload pool stopped");
        }
    }
}
