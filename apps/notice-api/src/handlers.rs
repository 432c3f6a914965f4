//! HTTP handlers for the notice API

use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::Cursor;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::GenerateNoticesRequest;
use crate::state::AppState;
use notice_core::{NoticeContext, NoticePipeline};

const DOWNLOAD_NAME: &str = "3day_notices.zip";

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Generate one flattened notice per CSV row and return them as a ZIP.
pub async fn generate_notices(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateNoticesRequest>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    // Input checks short-circuit before anything touches the filesystem.
    let ctx = NoticeContext::new(req.due_date, req.month, req.year, req.mailed_date)?;

    if req.csv_base64.trim().is_empty() {
        return Err(ApiError::InvalidRequest("No CSV file was uploaded".into()));
    }
    let csv_bytes = BASE64
        .decode(req.csv_base64.as_bytes())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid CSV base64: {}", e)))?;

    // The pipeline is synchronous file work; keep it off the runtime threads.
    let template = state.template.clone();
    let zip_bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let pipeline = NoticePipeline::new(template);
        let batch = pipeline.run(Cursor::new(csv_bytes), &ctx)?;

        tracing::info!("Generated {} notices", batch.artifacts().len());

        // Buffer the archive, then close the batch: its scoped workdir takes
        // every artifact and the archive with it.
        let bytes = std::fs::read(batch.archive()).map_err(|e| ApiError::Internal(e.into()))?;
        if let Err(e) = batch.close() {
            tracing::warn!("Failed to remove notice workdir: {}", e);
        }
        Ok(bytes)
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/zip".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
            ),
        ],
        zip_bytes,
    ))
}
