use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use crate::core::error::QueryError;
use crate::infra::config::ToolConfig;
use crate::infra::http::headers::{add_standard_headers, generate_request_id};
use crate::infra::runtime::limits::{make_http_client, make_http_client_with, retry_async};

pub const GET_CHARACTER_INFO: &str = "getCharacterInfo";
pub const LIST_ACTORS: &str = "listActors";

/// Query collaborator: runs a named operation on the VTT host and returns
/// its raw JSON result.
#[async_trait::async_trait]
pub trait ActorQuery: Send + Sync + 'static {
    async fn query(&self, operation: &str, params: Value) -> Result<Value, QueryError>;
}

/// HTTP client for the host's query bridge (`POST /api/query`).
#[derive(Clone)]
pub struct FoundryRemote {
    base: Option<String>,
    http: Client,
    retries: u32,
}

impl FoundryRemote {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: (!base.trim().is_empty()).then_some(base),
            http: make_http_client(),
            retries: 0,
        }
    }

    pub fn from_config(cfg: &ToolConfig) -> Self {
        Self {
            base: cfg.base_url.clone().filter(|b| !b.trim().is_empty()),
            http: make_http_client_with(cfg),
            retries: cfg.retries.unwrap_or(0),
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    fn url(&self, path: &str) -> Result<String, QueryError> {
        let base = self.base.as_deref().ok_or(QueryError::NotConfigured)?;
        Ok(format!("{}{}", base.trim_end_matches('/'), path))
    }

    pub async fn health(&self) -> bool {
        let Ok(url) = self.url("/health") else {
            return false;
        };
        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        match builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[derive(Serialize, Clone)]
struct QueryReq<'a> {
    method: &'a str,
    data: Value,
}

#[async_trait::async_trait]
impl ActorQuery for FoundryRemote {
    async fn query(&self, operation: &str, params: Value) -> Result<Value, QueryError> {
        let url = self.url("/api/query")?;
        tracing::debug!(endpoint = %url, operation, "foundry.query request");
        let http = self.http.clone();
        let req_id = generate_request_id();
        let payload = QueryReq { method: operation, data: params };
        let start = Instant::now();

        let res = retry_async(self.retries, QueryError::is_retryable, |_| {
            let http = http.clone();
            let url = url.clone();
            let req_id = req_id.clone();
            let payload = payload.clone();
            async move {
                let (builder, _rid) = add_standard_headers(http.post(url), Some(req_id));
                let resp = builder
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| QueryError::Transport(e.to_string()))?;
                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(QueryError::Upstream {
                        status: status.as_u16(),
                        body,
                    });
                }
                resp.json::<Value>()
                    .await
                    .map_err(|e| QueryError::Decode(e.to_string()))
            }
        })
        .await;

        if res.is_err() {
            crate::infra::logging::log_metric(operation, "remote_error_total", 1.0);
        }
        let out = res?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric(operation, "remote_latency_ms", elapsed_ms);
        Ok(out)
    }
}
