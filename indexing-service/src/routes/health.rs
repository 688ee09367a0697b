use crate::models::responses::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, response::Json};

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "indexing-service".to_string(),
        status: "running".to_string(),
        database: state.store().path().display().to_string(),
    })
}
