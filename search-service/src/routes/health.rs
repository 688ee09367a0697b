use crate::models::responses::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, response::Json};

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "search-service".to_string(),
        status: "running".to_string(),
        queries: state.catalog().len(),
    })
}
