pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use routes::{
    health::health_check,
    query::{list_queries, run_query},
};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route("/queries", get(list_queries))
        .route("/queries/run", post(run_query))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
