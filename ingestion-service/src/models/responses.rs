use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRequest {
    pub keyword: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngestResponse {
    pub search_id: Uuid,
    pub keyword: String,
    pub count: usize,
    pub pages_fetched: usize,
    pub warnings: Vec<String>,
    pub snapshot_path: Option<String>,
    pub fetched_at: String,
    pub items: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub count: usize,
    pub items: Vec<Value>,
}
