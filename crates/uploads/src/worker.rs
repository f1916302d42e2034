//! Worker loop and the per-job persistence routine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};

use presswork_core::upload::{validate_file_name, versioned_name};

use crate::job::{StoredFile, UploadError, UploadJob, UploadOutcome};

/// Upper bound on collision-versioning attempts per job.
const MAX_VERSION_ATTEMPTS: u32 = 100;

/// Worker loop: dequeue, process, reply, repeat.
///
/// Runs until the queue is closed and drained. A failing job is converted
/// into an error outcome and never terminates the loop.
pub(crate) async fn run_worker(id: usize, queue: Arc<Mutex<mpsc::Receiver<UploadJob>>>) {
    tracing::info!(worker_id = id, "Upload worker started");
    loop {
        // Hold the receiver lock only while dequeuing; processing happens
        // outside so other workers can pull jobs concurrently.
        let job = { queue.lock().await.recv().await };
        match job {
            Some(job) => process_job(id, job).await,
            None => break,
        }
    }
    tracing::info!(worker_id = id, "Upload worker stopped");
}

/// Process one job and send exactly one outcome on its reply channel.
async fn process_job(id: usize, job: UploadJob) {
    let UploadJob {
        mut source,
        dest_dir,
        declared_name,
        reply,
    } = job;

    tracing::debug!(worker_id = id, name = %declared_name, "Processing upload");

    let outcome = persist(&mut source, &dest_dir, &declared_name).await;

    match &outcome {
        Ok(stored) => tracing::info!(
            worker_id = id,
            original_name = %stored.original_name,
            stored_name = %stored.stored_name,
            "Upload persisted",
        ),
        Err(e) => tracing::warn!(
            worker_id = id,
            name = %declared_name,
            error = %e,
            "Upload failed",
        ),
    }

    // The single synchronization point with the submitter. If the receiver
    // is gone (submitter timed out or gave up), the outcome is discarded.
    if reply.send(outcome).is_err() {
        tracing::debug!(
            worker_id = id,
            name = %declared_name,
            "Reply receiver dropped before result delivery",
        );
    }
}

/// The persistence routine: resolve a destination, stream the bytes.
///
/// The file handle is released on every exit path (scope-bound). On a
/// mid-copy failure a partially written file may remain.
async fn persist(
    source: &mut crate::job::SourceStream,
    dest_dir: &Path,
    declared_name: &str,
) -> UploadOutcome {
    // Submissions through the pool are pre-validated; re-check here so the
    // invariant holds even for directly constructed jobs.
    validate_file_name(declared_name).map_err(|e| UploadError::InvalidName(e.to_string()))?;

    let (stored_name, mut file) = create_destination(dest_dir, declared_name).await?;

    match tokio::io::copy(source, &mut file).await {
        Ok(bytes) => {
            file.flush().await.map_err(|e| UploadError::Persist {
                name: declared_name.to_string(),
                source: e,
            })?;
            tracing::debug!(stored_name = %stored_name, bytes, "Upload bytes written");
            Ok(StoredFile {
                stored_name,
                original_name: declared_name.to_string(),
            })
        }
        Err(e) => Err(UploadError::Persist {
            name: declared_name.to_string(),
            source: e,
        }),
    }
}

/// Open the destination file, versioning the name on collision.
///
/// `create_new` makes the claim atomic: two in-flight jobs with the same
/// declared name can never open the same path, they race to distinct
/// versioned names instead.
async fn create_destination(
    dest_dir: &Path,
    declared_name: &str,
) -> Result<(String, File), UploadError> {
    for n in 0..=MAX_VERSION_ATTEMPTS {
        let candidate = versioned_name(declared_name, n);
        let path: PathBuf = dest_dir.join(&candidate);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(UploadError::Persist {
                    name: declared_name.to_string(),
                    source: e,
                })
            }
        }
    }

    Err(UploadError::Persist {
        name: declared_name.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("gave up after {MAX_VERSION_ATTEMPTS} name collisions"),
        ),
    })
}
