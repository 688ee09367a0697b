pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use routes::{
    health::health_check,
    ingest::{ingest_books, latest_snapshot},
};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route("/ingest", post(ingest_books))
        .route("/ingest/snapshot", get(latest_snapshot))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
