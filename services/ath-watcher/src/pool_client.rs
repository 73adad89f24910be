//! Client for the remote pool API

use std::sync::Arc;

use serde_json::Value;

use crate::io::HttpClient;

/// A decoded JSON object as returned by the pool API
pub type JsonObject = serde_json::Map<String, Value>;

pub const WORKERS_PATH: &str = "/api/pool/workers";
pub const SUMMARY_PATH: &str = "/api/pool";

/// Key under which a non-object JSON body is wrapped
pub const RAW_KEY: &str = "_raw";

/// Fetches worker lists and pool summaries for a chain
#[derive(Clone)]
pub struct PoolClient {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PoolClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolClient").finish_non_exhaustive()
    }
}

impl PoolClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// GET `{base_url}{path}` and decode the body as a JSON object.
    ///
    /// Transport failures and non-2xx statuses map to
    /// [`WatcherError::Transport`](crate::WatcherError::Transport); an
    /// undecodable body maps to [`WatcherError::Decode`](crate::WatcherError::Decode).
    pub async fn fetch(&self, base_url: &str, path: &str, token: &str) -> crate::Result<JsonObject> {
        let url = format!("{}{}", base_url, path);
        let response = self.http.get(&url, token).await?;

        if !response.is_success() {
            return Err(crate::WatcherError::Transport(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            crate::WatcherError::Decode(format!("Invalid JSON from {}: {}", url, e))
        })?;

        Ok(match value {
            Value::Object(obj) => obj,
            other => {
                let mut wrapped = JsonObject::new();
                wrapped.insert(RAW_KEY.to_string(), other);
                wrapped
            }
        })
    }

    pub async fn fetch_workers(&self, base_url: &str, token: &str) -> crate::Result<JsonObject> {
        self.fetch(base_url, WORKERS_PATH, token).await
    }

    pub async fn fetch_summary(&self, base_url: &str, token: &str) -> crate::Result<JsonObject> {
        self.fetch(base_url, SUMMARY_PATH, token).await
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Network difficulty from a pool summary.
///
/// Unknown, unparseable or non-positive difficulties yield `None`.
pub fn network_difficulty(summary: &JsonObject) -> Option<f64> {
    summary
        .get("network_difficulty")
        .and_then(numeric)
        .filter(|d| *d > 0.0)
}

/// Pool-wide hashrate from a pool summary
pub fn hashrate(summary: &JsonObject) -> Option<f64> {
    summary
        .get("hashrate")
        .and_then(numeric)
        .filter(|h| *h >= 0.0)
}
