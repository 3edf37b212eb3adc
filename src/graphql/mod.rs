//! GraphQL client for the MaxStudio backend.
//!
//! Wire DTOs, operation documents, the HTTP transport with credential
//! injection, and a typed client facade used by the views.

pub mod client;
pub mod operations;
pub mod schema;
pub mod transport;

pub use client::ApiClient;
pub use schema::{Account, IngestionRequest, SavedVideo, VideoDetail, VideoSummary};
pub use transport::{GraphqlRequest, GraphqlResponse, GraphqlTransport, HttpTransport};
