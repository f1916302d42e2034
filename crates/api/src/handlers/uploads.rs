//! Handler for multipart file uploads.
//!
//! Each file in the request becomes one job on the bounded upload pool.
//! Files are independent: one failure never aborts the batch, and the
//! response status reflects the aggregate (200 all stored, 202 partial,
//! 500 none stored).

use std::io::Cursor;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use presswork_uploads::{BatchOutcome, BatchStatus, FailedFile, SourceStream};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// One stored file in the upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Public URL the file is served under.
    pub url: String,
    pub file_name: String,
}

/// One failed file in the upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

/// Aggregate upload report.
#[derive(Debug, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedFile>,
    pub failed: Vec<RejectedFile>,
}

/// POST /api/v1/uploads
///
/// Multipart form fields without a file name (plain text fields) are
/// skipped. A request with no files at all is a 400. A body that breaks
/// mid-batch does not hide files already persisted for this request: the
/// unreadable file is recorded as failed and the aggregate is returned.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadReport>>)> {
    let mut batch = BatchOutcome::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if batch.is_empty() => {
                return Err(AppError::BadRequest(format!(
                    "Malformed multipart request: {e}"
                )));
            }
            Err(e) => {
                // The rest of the stream is unusable; report what we have.
                tracing::warn!(error = %e, "Multipart stream broke mid-request");
                break;
            }
        };

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(name = %file_name, error = %e, "Failed to read upload body");
                batch.failed.push(FailedFile {
                    original_name: file_name,
                    reason: format!("failed to read upload body: {e}"),
                });
                break;
            }
        };

        let source: SourceStream = Box::new(Cursor::new(bytes));
        let outcome = state
            .uploads
            .submit_and_wait(source, state.config.upload_dir.clone(), file_name.clone())
            .await;
        batch.record(&file_name, outcome);
    }

    if batch.is_empty() {
        return Err(AppError::BadRequest("No files in request".into()));
    }

    let status = match batch.status() {
        BatchStatus::Complete => StatusCode::OK,
        BatchStatus::Partial => StatusCode::ACCEPTED,
        BatchStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::info!(
        stored = batch.stored.len(),
        failed = batch.failed.len(),
        "Upload batch finished",
    );

    let report = UploadReport {
        uploaded: batch
            .stored
            .into_iter()
            .map(|f| UploadedFile {
                url: format!(
                    "{}/assets/{}",
                    state.config.public_base_url, f.stored_name
                ),
                file_name: f.stored_name,
            })
            .collect(),
        failed: batch
            .failed
            .into_iter()
            .map(|f| RejectedFile {
                file_name: f.original_name,
                reason: f.reason,
            })
            .collect(),
    };

    Ok((status, Json(DataResponse { data: report })))
}
