//! Upload job and outcome types.

use std::fmt;
use std::path::PathBuf;

use tokio::io::AsyncRead;
use tokio::sync::oneshot;

/// The byte stream of an upload.
///
/// The caller owns the stream's lifecycle: it is opened before the job is
/// constructed and closed (dropped) by the caller after the reply arrives.
/// Workers only read from it.
pub type SourceStream = Box<dyn AsyncRead + Send + Unpin>;

/// One file to persist.
///
/// Consumed by exactly one worker exactly once; jobs are never requeued,
/// retried, or duplicated by the pool.
pub struct UploadJob {
    /// Bytes to persist.
    pub source: SourceStream,
    /// Target directory. Must exist before the job is submitted; the pool
    /// does not create directories.
    pub dest_dir: PathBuf,
    /// Caller-declared file name. Must pass
    /// [`validate_file_name`](presswork_core::upload::validate_file_name)
    /// -- workers refuse to join an unchecked name into a path.
    pub declared_name: String,
    /// Single-use reply channel owned by the submitter. The worker sends
    /// exactly one [`UploadOutcome`] and never reads. A send after the
    /// receiver was dropped (e.g. the submitter timed out) is discarded
    /// without blocking.
    pub reply: oneshot::Sender<UploadOutcome>,
}

impl fmt::Debug for UploadJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadJob")
            .field("dest_dir", &self.dest_dir)
            .field("declared_name", &self.declared_name)
            .finish_non_exhaustive()
    }
}

/// A successfully persisted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name the bytes were actually written under. Differs from the
    /// declared name only when collision versioning kicked in.
    pub stored_name: String,
    /// Echo of the caller-declared name, for response construction.
    pub original_name: String,
}

/// Outcome of one upload job.
pub type UploadOutcome = Result<StoredFile, UploadError>;

/// Everything that can go wrong between submission and persistence.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The declared name failed validation. Checked before enqueue; no
    /// filesystem path is ever built from an invalid name.
    #[error("invalid file name: {0}")]
    InvalidName(String),

    /// The queue was at capacity. The sole backpressure signal: surfaced
    /// immediately, and no outcome is ever produced for the rejected job.
    #[error("upload queue is full")]
    QueueFull,

    /// The pool has been shut down and accepts no new jobs.
    #[error("upload pool is closed")]
    PoolClosed,

    /// The reply deadline expired while the job was queued or in flight.
    /// The worker's eventual result (if any) is discarded.
    #[error("timed out waiting for upload result")]
    ReplyTimeout,

    /// The worker disappeared without replying. Workers always reply, so
    /// this indicates a bug or a task abort.
    #[error("upload worker dropped the reply channel")]
    ReplyDropped,

    /// Creating the destination or copying bytes failed. A partially
    /// written file may remain; there is no temp-file-then-rename step.
    #[error("failed to persist {name:?}: {source}")]
    Persist {
        /// The caller-declared name of the failed file.
        name: String,
        #[source]
        source: std::io::Error,
    },
}
