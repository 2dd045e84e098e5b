//! HTTP backend for the hosted content API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ContentStore, SlotQuery, SlotRecord, records_from_result};
use crate::config::StoreConfig;
use crate::error::VitrineError;

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Queries the content API's public read endpoint.
///
/// Reads are unauthenticated. The request timeout comes from
/// [`StoreConfig::timeout`] so a stalled store cannot hang a page render.
pub struct HttpContentStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContentStore {
    /// Build a client from configuration. Requires a project id.
    pub fn new(config: &StoreConfig) -> Result<Self, VitrineError> {
        let project_id = config.project_id.as_deref().ok_or_else(|| {
            VitrineError::Config("VITRINE_STORE_PROJECT_ID is required for the HTTP store".into())
        })?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| VitrineError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(client, endpoint_url(project_id, config)))
    }

    /// Use a prepared client against an explicit query endpoint.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// `https://<project>.api[cdn].sanity.io/v<version>/data/query/<dataset>`
fn endpoint_url(project_id: &str, config: &StoreConfig) -> String {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    format!(
        "https://{}.{}.sanity.io/v{}/data/query/{}",
        project_id, host, config.api_version, config.dataset
    )
}

/// URL query arguments: the query itself plus each `$name` parameter as JSON.
fn query_pairs(query: &SlotQuery) -> Vec<(String, String)> {
    let mut pairs = vec![("query".to_string(), query.query())];
    for (name, value) in query.params() {
        pairs.push((format!("${}", name), value.to_string()));
    }
    pairs
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch(&self, query: &SlotQuery) -> Result<Vec<SlotRecord>, VitrineError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_pairs(query))
            .send()
            .await
            .map_err(|e| VitrineError::Transport(format!("Failed to query {}: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VitrineError::Transport(format!(
                "Failed to query {}: HTTP {}",
                self.endpoint, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VitrineError::Transport(format!("Failed to read response: {}", e)))?;
        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| VitrineError::Decode(format!("Malformed query response: {}", e)))?;

        let records = records_from_result(parsed.result)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            count = records.len(),
            "content store query"
        );
        Ok(records)
    }
}
