use crate::error::ApiResult;
use crate::models::responses::{
    BooksQuery, BooksResponse, IndexRequest, IndexResponse, IndexStatusResponse,
};
use crate::services::normalize::normalize_batch;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use tracing::info;

pub async fn index_books(
    State(state): State<AppState>,
    Json(request): Json<IndexRequest>,
) -> ApiResult<Json<IndexResponse>> {
    let search_id = request.search_id.as_deref().unwrap_or("-");
    info!(
        "Indexing {} items for '{}' (search {})",
        request.items.len(),
        request.keyword,
        search_id
    );

    let batch = normalize_batch(&request.items, &request.keyword);

    let _writes = state.lock_writes().await;
    let summary = state.store().replace_all(&batch.records).await?;
    state.mark_updated(Utc::now()).await;

    Ok(Json(IndexResponse {
        keyword: request.keyword,
        received: request.items.len(),
        stored: summary.inserted,
        skipped: batch.skipped,
        ignored: summary.ignored,
        status: "indexed".to_string(),
    }))
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> ApiResult<Json<BooksResponse>> {
    let books = state.store().load_by_keyword(&query.keyword).await?;

    Ok(Json(BooksResponse {
        keyword: query.keyword,
        count: books.len(),
        books,
    }))
}

pub async fn get_index_status(State(state): State<AppState>) -> ApiResult<Json<IndexStatusResponse>> {
    let books_stored = state.store().count().await?;

    Ok(Json(IndexStatusResponse {
        books_stored,
        database_path: state.store().path().display().to_string(),
        last_update: state.last_update().await.map(|at| at.to_rfc3339()),
    }))
}
