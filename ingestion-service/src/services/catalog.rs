use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

/// Number of items requested per page; also the offset step between pages.
pub const PAGE_SIZE: usize = 40;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Error fetching data: {0}")]
    Status(u16),
    #[error("Failed to parse API response: {0}")]
    Parse(String),
    #[error("Request failed: {0}")]
    Transport(String),
}

/// One page of raw catalog items starting at `start_index`.
///
/// An empty page means the catalog has nothing more for this keyword.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&self, keyword: &str, start_index: usize) -> Result<Vec<Value>, PageError>;
}

pub struct GoogleBooksSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn query_params(&self, keyword: &str, start_index: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", keyword.to_string()),
            ("startIndex", start_index.to_string()),
            ("maxResults", PAGE_SIZE.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params
    }
}

#[async_trait]
impl PageSource for GoogleBooksSource {
    async fn fetch_page(&self, keyword: &str, start_index: usize) -> Result<Vec<Value>, PageError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(keyword, start_index))
            .send()
            .await
            .map_err(|e| PageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PageError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PageError::Transport(e.to_string()))?;

        parse_page(&body)
    }
}

/// Extracts the `items` list from a volumes response body.
/// A body without `items` is a valid, empty page.
pub fn parse_page(body: &str) -> Result<Vec<Value>, PageError> {
    let data: Value = serde_json::from_str(body).map_err(|e| PageError::Parse(e.to_string()))?;

    match data {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub items: Vec<Value>,
    pub pages_fetched: usize,
    pub warnings: Vec<String>,
}

/// Pages through the catalog until `max_results` items are collected or a
/// page comes back empty. A failed page ends pagination; items collected
/// before it are kept.
pub async fn fetch_books<S>(source: &S, keyword: &str, max_results: usize) -> FetchOutcome
where
    S: PageSource + Sync + ?Sized,
{
    let mut outcome = FetchOutcome::default();
    let mut start_index = 0;

    while outcome.items.len() < max_results {
        outcome.pages_fetched += 1;

        match source.fetch_page(keyword, start_index).await {
            Ok(page) if page.is_empty() => {
                info!("No more items for '{}' at offset {}", keyword, start_index);
                break;
            }
            Ok(page) => {
                outcome.items.extend(page);
                start_index += PAGE_SIZE;
            }
            Err(e) => {
                match &e {
                    PageError::Parse(_) => error!("Page at offset {} for '{}': {}", start_index, keyword, e),
                    _ => warn!("Page at offset {} for '{}': {}", start_index, keyword, e),
                }
                outcome.warnings.push(e.to_string());
                break;
            }
        }
    }

    outcome.items.truncate(max_results);
    info!(
        "Fetched {} items for '{}' in {} requests",
        outcome.items.len(),
        keyword,
        outcome.pages_fetched
    );
    outcome
}
