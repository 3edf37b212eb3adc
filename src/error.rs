use serde::{Deserialize, Serialize};

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Failure of a query or mutation.
///
/// Views never branch on the variant: network failures, HTTP status errors
/// and server-reported GraphQL errors all surface as the same kind of
/// "request failed" message via [`RequestError::message`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The HTTP request itself failed (connection refused, DNS, TLS, etc.).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status and no GraphQL errors.
    #[error("Response not successful: Received status code {status}")]
    Status { status: u16, body: String },

    /// The server reported one or more GraphQL errors.
    #[error("{}", join_messages(.0))]
    Graphql(Vec<GraphqlError>),

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Human-readable message shown verbatim by the views.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type RequestResult<T> = Result<T, RequestError>;

fn join_messages(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "Unknown GraphQL error".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
