use crate::error::{ApiError, ApiResult};
use crate::models::responses::{QueryListResponse, QueryResponse, QuerySummary, RunQueryRequest};
use crate::state::AppState;
use axum::{extract::State, response::Json};
use tracing::info;

pub async fn list_queries(State(state): State<AppState>) -> Json<QueryListResponse> {
    let queries: Vec<QuerySummary> = state
        .catalog()
        .iter()
        .map(|(id, query)| QuerySummary {
            id,
            name: query.name.to_string(),
        })
        .collect();

    Json(QueryListResponse {
        count: queries.len(),
        queries,
    })
}

pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<RunQueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let (id, query) = state
        .catalog()
        .resolve(&request.name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown query: {}", request.name)))?;

    info!("Running query {}: {}", id, query.name);
    let result = state.runner().run(query.sql).await?;

    let status = if result.is_empty() { "empty" } else { "ok" };
    info!("Query {} returned {} rows", id, result.rows.len());

    Ok(Json(QueryResponse {
        id,
        name: query.name.to_string(),
        status: status.to_string(),
        count: result.rows.len(),
        columns: result.columns,
        rows: result.rows,
    }))
}

#[cfg(test)]
mod tests {
    use crate::services::executor::tests::seed;
    use crate::services::executor::QueryRunner;
    use crate::services::queries::{NamedQuery, QueryCatalog};
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;
    use tower::ServiceExt;

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = crate::router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn run_request(name: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/queries/run")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "name": name }).to_string()))
            .unwrap()
    }

    fn state(path: &Path, catalog: QueryCatalog) -> AppState {
        AppState::new(catalog, QueryRunner::new(path))
    }

    #[tokio::test]
    async fn lists_the_catalog_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir.path().join("book_data.db"), QueryCatalog::standard());

        let request = Request::builder().uri("/queries").body(Body::empty()).unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 20);
        assert_eq!(body["queries"][0]["id"], 1);
        assert_eq!(body["queries"][0]["name"], "Check Availability of eBooks vs Physical Books");
    }

    #[tokio::test]
    async fn empty_result_is_reported_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(&path, &[]).await;

        let (status, body) = send(state(&path, QueryCatalog::standard()), run_request("6")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "empty");
        assert_eq!(body["count"], 0);
        assert_eq!(body["name"], "List Books with Discounts Greater than 20%");
    }

    #[tokio::test]
    async fn rows_come_back_with_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(
            &path,
            &[
                ("a", "A", None, None, Some(true), Some(300), ""),
                ("b", "B", None, None, Some(false), Some(100), ""),
                ("c", "C", None, None, Some(true), Some(500), ""),
            ],
        )
        .await;

        let (status, body) = send(
            state(&path, QueryCatalog::standard()),
            run_request("Check Availability of eBooks vs Physical Books"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["columns"], json!(["Book_Type", "Count"]));
        assert_eq!(body["rows"], json!([["Physical Books", 1], ["eBooks", 2]]));
    }

    #[tokio::test]
    async fn unknown_query_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir.path().join("book_data.db"), QueryCatalog::standard());

        let (status, body) = send(state, run_request("Most Popular Dragons")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "notFound");
    }

    #[tokio::test]
    async fn failing_query_does_not_affect_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_data.db");
        seed(&path, &[("a", "A", None, None, None, None, "")]).await;
        let catalog = QueryCatalog::new(vec![
            NamedQuery { name: "Broken", sql: "SELECT Missing_Column FROM books" },
            NamedQuery { name: "Count", sql: "SELECT COUNT(*) AS n FROM books" },
        ]);
        let state = state(&path, catalog);

        let (status, body) = send(state.clone(), run_request("Broken")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "queryError");
        assert!(body["error"]["message"].as_str().unwrap().contains("Missing_Column"));

        let (status, body) = send(state, run_request("Count")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], json!([[1]]));
    }
}
