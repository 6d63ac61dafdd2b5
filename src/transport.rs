//! GraphQL-over-HTTP transport

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::QueryError;

/// GraphQL request payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: serde_json::Value,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: serde_json::Value) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn operation(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous")
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
}

/// Untyped GraphQL response envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
}

/// Executes a GraphQL request and returns the raw envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, QueryError>;
}

/// reqwest-backed transport with fixed timeouts and request/response logging.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, QueryError> {
        let started = Instant::now();
        debug!(
            operation = request.operation(),
            variables = %request.variables,
            "--> POST {}",
            self.endpoint
        );

        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(
            operation = request.operation(),
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "<-- response"
        );
        trace!(body = %String::from_utf8_lossy(&bytes), "response body");

        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 512;
    let body = String::from_utf8_lossy(bytes);
    if body.len() <= MAX_LEN {
        return body.into_owned();
    }
    let mut end = MAX_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
