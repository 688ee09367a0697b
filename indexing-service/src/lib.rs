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
    index::{get_index_status, index_books, list_books},
};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route("/index", post(index_books))
        .route("/index/status", get(get_index_status))
        .route("/books", get(list_books))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
