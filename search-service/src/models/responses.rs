use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub queries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuerySummary {
    pub id: usize,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryListResponse {
    pub count: usize,
    pub queries: Vec<QuerySummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunQueryRequest {
    /// Exact analysis name, or its 1-based id.
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub id: usize,
    pub name: String,
    /// `"ok"` when rows came back, `"empty"` when the query matched nothing.
    pub status: String,
    pub count: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
