use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::storage::BookRecord;

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexRequest {
    pub keyword: String,
    #[serde(default)]
    pub items: Vec<Value>,
    /// Correlation id handed out by the ingestion service.
    #[serde(default)]
    pub search_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub keyword: String,
    pub received: usize,
    pub stored: u64,
    pub skipped: usize,
    pub ignored: u64,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooksQuery {
    pub keyword: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooksResponse {
    pub keyword: String,
    pub count: usize,
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStatusResponse {
    pub books_stored: i64,
    pub database_path: String,
    /// `None` until the first successful index.
    pub last_update: Option<String>,
}
