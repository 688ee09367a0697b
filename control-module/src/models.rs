use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct IngestRequest<'a> {
    pub keyword: &'a str,
    pub max_results: usize,
}

#[derive(Debug, Deserialize)]
pub struct IngestResponse {
    pub search_id: String,
    pub keyword: String,
    pub count: usize,
    pub pages_fetched: usize,
    pub warnings: Vec<String>,
    pub snapshot_path: Option<String>,
    pub items: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct IndexRequest<'a> {
    pub keyword: &'a str,
    pub items: &'a [Value],
    pub search_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    pub received: usize,
    pub stored: u64,
    pub skipped: usize,
    pub ignored: u64,
    pub status: String,
}

/// The subset of a stored book the terminal shows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookRow {
    pub book_id: String,
    pub title: String,
    pub authors: String,
    pub page_count: Option<i64>,
    pub average_rating: Option<f64>,
    pub is_ebook: Option<bool>,
    pub retail_price_amount: Option<f64>,
    pub retail_price_currency: String,
    pub image_links: String,
    pub year: String,
}

#[derive(Debug, Deserialize)]
pub struct BooksResponse {
    pub count: usize,
    pub books: Vec<BookRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySummary {
    pub id: usize,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryListResponse {
    pub queries: Vec<QuerySummary>,
}

#[derive(Debug, Serialize)]
pub struct RunQueryRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub id: usize,
    pub name: String,
    pub status: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Outcome of one search action, ready for display.
#[derive(Debug, Default)]
pub struct SearchReport {
    pub keyword: String,
    pub fetched: usize,
    pub warnings: Vec<String>,
    pub books: Vec<BookRow>,
}
