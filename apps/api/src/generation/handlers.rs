//! Axum route handlers for the Content API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::MutexGuard;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{generate_content, GenerateRequest, GenerateResponse};
use crate::state::AppState;
use crate::store::{ContentStore, TableRow};

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub rows: Vec<TableRow>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/content/generate
///
/// Runs the full flow: validate → caption → image lookup → compose/append.
/// Caption-only results come back with `record_appended: false` and a warning.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = generate_content(&state, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/content/history
///
/// Ordered table rows `(timestamp, topic, tone, caption)` for the session.
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, AppError> {
    let store = lock_store(&state)?;
    Ok(Json(HistoryResponse {
        rows: store.as_table(),
        total: store.len(),
    }))
}

/// GET /api/v1/content/export
///
/// All record fields as CSV, insertion order, served as a file download.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let csv_bytes = lock_store(&state)?.export_csv()?;

    let filename = format!("palm_content_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv_bytes,
    )
        .into_response())
}

/// DELETE /api/v1/content/history
///
/// Clears the session store. Irreversible.
pub async fn handle_clear(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    let mut store = lock_store(&state)?;
    let cleared = store.len();
    store.clear();
    info!("Content history cleared ({cleared} records)");
    Ok(Json(ClearResponse { cleared }))
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, ContentStore>, AppError> {
    state
        .store
        .lock()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("content store mutex poisoned")))
}
