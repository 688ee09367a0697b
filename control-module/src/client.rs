use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{
    BooksResponse, HealthResponse, IndexRequest, IndexResponse, IngestRequest, IngestResponse,
    QueryListResponse, QueryResponse, QuerySummary, RunQueryRequest, SearchReport,
};

const READY_ATTEMPTS: usize = 15;
const READY_INTERVAL: Duration = Duration::from_secs(2);

pub type ControlResult<T> = Result<T, Box<dyn Error>>;

pub struct ControlModule {
    client: Client,
    config: Config,
}

impl ControlModule {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn wait_for_services(&self) -> ControlResult<()> {
        info!("Waiting for services to be ready...");

        let services = [
            ("Ingestion", format!("{}/status", self.config.ingestion_url)),
            ("Indexing", format!("{}/status", self.config.indexing_url)),
            ("Search", format!("{}/status", self.config.search_url)),
        ];

        for (name, url) in &services {
            let mut attempt = 1;
            loop {
                match self.client.get(url).send().await {
                    Ok(response) if response.status().is_success() => {
                        let health: HealthResponse = response.json().await?;
                        info!("{} is {}", health.service, health.status);
                        break;
                    }
                    Ok(response) => {
                        warn!("{} service responded with status: {}", name, response.status());
                    }
                    Err(e) => {
                        warn!("{} service not ready: {}", name, e);
                    }
                }

                if attempt == READY_ATTEMPTS {
                    return Err(format!(
                        "{} service did not become ready after {} attempts",
                        name, READY_ATTEMPTS
                    )
                    .into());
                }
                attempt += 1;
                sleep(READY_INTERVAL).await;
            }
        }

        info!("All services are ready!");
        Ok(())
    }

    pub async fn ingest(&self, keyword: &str, max_results: usize) -> ControlResult<IngestResponse> {
        info!("Fetching up to {} books for '{}'", max_results, keyword);

        let url = format!("{}/ingest", self.config.ingestion_url);
        let response = self
            .client
            .post(&url)
            .json(&IngestRequest { keyword, max_results })
            .send()
            .await?;
        let ingest: IngestResponse = read_json(response).await?;

        info!(
            "Search {} fetched {} items for '{}' in {} pages (snapshot: {})",
            ingest.search_id,
            ingest.count,
            ingest.keyword,
            ingest.pages_fetched,
            ingest.snapshot_path.as_deref().unwrap_or("not written")
        );
        Ok(ingest)
    }

    pub async fn index(&self, keyword: &str, items: &[Value], search_id: &str) -> ControlResult<IndexResponse> {
        let url = format!("{}/index", self.config.indexing_url);
        let response = self
            .client
            .post(&url)
            .json(&IndexRequest { keyword, items, search_id })
            .send()
            .await?;
        let index: IndexResponse = read_json(response).await?;

        if index.status != "indexed" {
            return Err(format!("Indexing '{}' ended with status: {}", keyword, index.status).into());
        }
        info!(
            "Indexed {} of {} items ({} skipped, {} duplicates)",
            index.stored, index.received, index.skipped, index.ignored
        );
        Ok(index)
    }

    pub async fn load_books(&self, keyword: &str) -> ControlResult<BooksResponse> {
        let url = format!("{}/books", self.config.indexing_url);
        let response = self
            .client
            .get(&url)
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        let books: BooksResponse = read_json(response).await?;

        info!("Loaded {} stored books for '{}'", books.count, keyword);
        Ok(books)
    }

    /// Fetch, store and read back one keyword. An empty fetch leaves the store untouched.
    pub async fn search(&self, keyword: &str, max_results: usize) -> ControlResult<SearchReport> {
        let ingest = self.ingest(keyword, max_results).await?;
        let mut report = SearchReport {
            keyword: keyword.to_string(),
            fetched: ingest.items.len(),
            warnings: ingest.warnings,
            books: Vec::new(),
        };

        if ingest.items.is_empty() {
            return Ok(report);
        }

        self.index(keyword, &ingest.items, &ingest.search_id).await?;
        report.books = self.load_books(keyword).await?.books;
        Ok(report)
    }

    pub async fn list_queries(&self) -> ControlResult<Vec<QuerySummary>> {
        let url = format!("{}/queries", self.config.search_url);
        let response = self.client.get(&url).send().await?;
        let list: QueryListResponse = read_json(response).await?;
        Ok(list.queries)
    }

    pub async fn run_query(&self, selector: &str) -> ControlResult<QueryResponse> {
        let url = format!("{}/queries/run", self.config.search_url);
        let response = self
            .client
            .post(&url)
            .json(&RunQueryRequest { name: selector })
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ControlResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status.as_u16(), &body);
    error!("{}", message);
    Err(message.into())
}

/// Pulls `error.message` out of a service error body, falling back to the status code.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stands in for all three services. `/ingest` returns `items`;
    /// `/index` only counts its calls; `/books` returns one stored book.
    #[derive(Clone)]
    struct Stub {
        items: Arc<Vec<Value>>,
        index_calls: Arc<AtomicUsize>,
    }

    async fn ingest(State(stub): State<Stub>, Json(request): Json<Value>) -> Json<Value> {
        Json(json!({
            "search_id": "s-1",
            "keyword": request["keyword"],
            "count": stub.items.len(),
            "pages_fetched": 1,
            "warnings": ["Error fetching data: 503"],
            "snapshot_path": null,
            "fetched_at": "2026-01-01T00:00:00+00:00",
            "items": stub.items.as_slice(),
        }))
    }

    async fn index(State(stub): State<Stub>, Json(request): Json<Value>) -> Json<Value> {
        stub.index_calls.fetch_add(1, Ordering::SeqCst);
        let received = request["items"].as_array().map_or(0, Vec::len);
        Json(json!({
            "keyword": request["keyword"],
            "received": received,
            "stored": received,
            "skipped": 0,
            "ignored": 0,
            "status": "indexed",
        }))
    }

    async fn books() -> Json<Value> {
        Json(json!({
            "keyword": "dune",
            "count": 1,
            "books": [{
                "book_id": "a", "search_key": "dune", "title": "Dune", "authors": "Frank Herbert",
                "page_count": 412, "average_rating": null, "is_ebook": true,
                "retail_price_amount": null, "retail_price_currency": "",
                "image_links": "{}", "year": "1965"
            }]
        }))
    }

    async fn control_with(items: Vec<Value>) -> (ControlModule, Arc<AtomicUsize>) {
        let stub = Stub {
            items: Arc::new(items),
            index_calls: Arc::new(AtomicUsize::new(0)),
        };
        let index_calls = stub.index_calls.clone();
        let app = Router::new()
            .route("/ingest", post(ingest))
            .route("/index", post(index))
            .route("/books", get(books))
            .with_state(stub);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let config = Config {
            ingestion_url: base.clone(),
            indexing_url: base.clone(),
            search_url: base,
            max_results: 40,
        };
        (ControlModule::new(config), index_calls)
    }

    #[tokio::test]
    async fn empty_fetch_never_touches_the_store() {
        let (control, index_calls) = control_with(Vec::new()).await;

        let report = control.search("zzzz", 40).await.unwrap();

        assert_eq!(report.fetched, 0);
        assert!(report.books.is_empty());
        assert_eq!(report.warnings, vec!["Error fetching data: 503".to_string()]);
        assert_eq!(index_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetched_items_are_indexed_then_read_back() {
        let (control, index_calls) = control_with(vec![json!({ "id": "a" })]).await;

        let report = control.search("dune", 40).await.unwrap();

        assert_eq!(report.fetched, 1);
        assert_eq!(index_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.books.len(), 1);
        assert_eq!(report.books[0].title, "Dune");
    }

    #[test]
    fn error_body_message_is_preferred() {
        let body = r#"{"error":{"type":"queryError","message":"Error executing query: no such column: X","statusCode":500}}"#;
        assert_eq!(error_message(500, body), "Error executing query: no such column: X");
    }

    #[test]
    fn unreadable_body_falls_back_to_status() {
        assert_eq!(error_message(502, "Bad Gateway"), "Request failed with status 502");
        assert_eq!(error_message(404, r#"{"detail":"x"}"#), "Request failed with status 404");
    }
}
