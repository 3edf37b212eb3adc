//! MaxStudio client library.
//!
//! Typed access to the MaxStudio GraphQL backend (catalog, detail, sign-in,
//! ingestion), credential storage, HLS playback attachment, and the view
//! controllers the terminal front end drives.

pub mod config;
pub mod error;
pub mod graphql;
pub mod playback;
pub mod render;
pub mod storage;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{RequestError, RequestResult};
pub use graphql::{ApiClient, HttpTransport};
pub use storage::{FileStore, KeyValueStore, NoopStore};
