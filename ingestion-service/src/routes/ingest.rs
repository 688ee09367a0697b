use crate::error::{ApiError, ApiResult};
use crate::models::responses::{IngestRequest, IngestResponse, SnapshotResponse};
use crate::services::catalog::fetch_books;
use crate::state::AppState;
use crate::utils::file::{read_snapshot, write_snapshot};
use axum::{extract::State, response::Json};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

pub async fn ingest_books(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> ApiResult<Json<IngestResponse>> {
    if request.keyword.trim().is_empty() {
        return Err(ApiError::BadRequest("keyword must not be empty".to_string()));
    }

    let max_results = request.max_results.unwrap_or(state.config().max_results);
    let _run = state.lock_run().await;

    let search_id = Uuid::new_v4();
    info!("Search {} for '{}' (cap {})", search_id, request.keyword, max_results);

    let outcome = fetch_books(state.source(), &request.keyword, max_results).await;
    let mut warnings = outcome.warnings;

    let snapshot_path = if outcome.items.is_empty() {
        None
    } else {
        let path = &state.config().snapshot_path;
        match write_snapshot(path, &outcome.items) {
            Ok(()) => Some(path.display().to_string()),
            Err(e) => {
                error!("Error saving JSON to {}: {}", path.display(), e);
                warnings.push(format!("Error saving JSON: {}", e));
                None
            }
        }
    };

    Ok(Json(IngestResponse {
        search_id,
        keyword: request.keyword,
        count: outcome.items.len(),
        pages_fetched: outcome.pages_fetched,
        warnings,
        snapshot_path,
        fetched_at: Utc::now().to_rfc3339(),
        items: outcome.items,
    }))
}

pub async fn latest_snapshot(State(state): State<AppState>) -> ApiResult<Json<SnapshotResponse>> {
    let path = &state.config().snapshot_path;
    let items = read_snapshot(path).map_err(|e| {
        if e.is_not_found() {
            ApiError::NotFound(format!("no snapshot at {}", path.display()))
        } else {
            ApiError::Snapshot(e)
        }
    })?;

    Ok(Json(SnapshotResponse {
        count: items.len(),
        items,
    }))
}
