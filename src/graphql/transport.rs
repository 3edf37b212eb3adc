//! HTTP transport for GraphQL requests.
//!
//! One [`HttpTransport`] is built at startup and shared by every view. It
//! reads the stored credential before each request and attaches it as
//! `authorization: JWT <token>`; without a credential no authorization header
//! is sent.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{GraphqlError, RequestError, RequestResult};
use crate::storage::{load_credential, KeyValueStore};

/// Authorization scheme expected by the backend's JWT middleware.
pub const AUTH_SCHEME: &str = "JWT";

/// Body of a GraphQL POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(rename = "operationName")]
    pub operation_name: String,
    pub variables: serde_json::Value,
}

/// Raw GraphQL response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// Sends GraphQL requests to the backend.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> RequestResult<GraphqlResponse>;
}

/// Header value for a stored token, or `None` when no token is held.
pub fn authorization_value(token: Option<&str>) -> Option<String> {
    token
        .filter(|t| !t.is_empty())
        .map(|t| format!("{AUTH_SCHEME} {t}"))
}

/// reqwest-backed transport bound to a single endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    store: Arc<dyn KeyValueStore>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, store)
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            store,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the outgoing HTTP request, credential header included.
    pub async fn build_request(&self, request: &GraphqlRequest) -> RequestResult<reqwest::Request> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request);

        let token = load_credential(self.store.as_ref()).await;
        if let Some(value) = authorization_value(token.as_deref()) {
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> RequestResult<GraphqlResponse> {
        let http_request = self.build_request(request).await?;
        tracing::debug!(
            operation = %request.operation_name,
            endpoint = %self.endpoint,
            authenticated = http_request.headers().contains_key(AUTHORIZATION),
            "Sending GraphQL request"
        );

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Servers report validation failures as 4xx with a GraphQL errors body.
            if let Ok(parsed) = serde_json::from_str::<GraphqlResponse>(&body) {
                if !parsed.errors.is_empty() {
                    return Ok(parsed);
                }
            }
            tracing::warn!(
                operation = %request.operation_name,
                status = status.as_u16(),
                "GraphQL endpoint returned an error status"
            );
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
