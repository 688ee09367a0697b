use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Ingestion settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Volumes endpoint of the book catalog.
    pub api_url: String,
    /// Optional access credential sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Where the raw items of the latest search are written.
    pub snapshot_path: PathBuf,
    /// Result cap used when a request does not name one.
    pub max_results: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_var("PORT", 7001, "port number")?,
            api_url: env::var("BOOKS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var("BOOKS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            snapshot_path: env::var("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("book_data.json")),
            max_results: parse_var("MAX_RESULTS", 1000, "result count")?,
        })
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
