use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MAX_RESULTS must be a valid result count, got {0:?}")]
    InvalidMaxResults(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ingestion_url: String,
    pub indexing_url: String,
    pub search_url: String,
    /// Cap sent with every search unless `--max` overrides it.
    pub max_results: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_results = match env::var("MAX_RESULTS") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxResults(value))?,
            Err(_) => 1000,
        };

        Ok(Self {
            ingestion_url: service_url("INGESTION_SERVICE_URL", "http://0.0.0.0:7001"),
            indexing_url: service_url("INDEXING_SERVICE_URL", "http://0.0.0.0:7002"),
            search_url: service_url("SEARCH_SERVICE_URL", "http://0.0.0.0:7003"),
            max_results,
        })
    }
}

fn service_url(name: &str, default: &str) -> String {
    env::var(name)
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}
