//! Bounded concurrent upload processing.
//!
//! A fixed set of workers consumes file-save jobs from one bounded queue.
//! Submission is non-blocking: when the queue is full the caller is told
//! immediately instead of waiting. Each accepted job produces exactly one
//! outcome on its private reply channel -- a failed persist never takes a
//! worker down, and a rejected submission never produces an outcome at all.
//!
//! # Architecture
//!
//! - [`UploadJob`]: one file to persist (source stream, destination
//!   directory, declared name) plus its single-use reply channel.
//! - [`UploadPool`]: owns the queue, spawns the workers, and offers both
//!   the raw non-blocking [`try_submit`](UploadPool::try_submit) and the
//!   deadline-bounded [`submit_and_wait`](UploadPool::submit_and_wait).
//! - [`BatchOutcome`]: aggregation of per-file results for multi-file
//!   requests (full / partial / total failure).
//!
//! Shutdown closes the queue; workers drain what was already accepted and
//! then stop.

mod batch;
mod job;
mod pool;
mod worker;

pub use batch::{BatchOutcome, BatchStatus, FailedFile};
pub use job::{SourceStream, StoredFile, UploadError, UploadJob, UploadOutcome};
pub use pool::{SubmitError, UploadPool, UploadPoolConfig};
