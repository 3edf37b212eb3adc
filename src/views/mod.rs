//! View controllers.
//!
//! Each view issues its request through an explicitly passed [`ApiClient`]
//! and exposes a [`ViewState`] for the renderer. Views own no shared state
//! besides the client and, for sign-in, the credential store.
//!
//! [`ApiClient`]: crate::graphql::ApiClient

pub mod account;
pub mod catalog;
pub mod detail;
pub mod form;
pub mod ingest;
pub mod login;
pub mod saved;

use parking_lot::Mutex;
use std::fmt;

use crate::error::RequestResult;

pub use account::AccountView;
pub use catalog::CatalogView;
pub use detail::DetailView;
pub use form::{FormCell, SubmitError, SubmitPhase};
pub use ingest::{IngestForm, IngestView};
pub use login::{LoginForm, LoginView};
pub use saved::SavedView;

/// Request lifecycle of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    /// The requested record does not exist. Not an error.
    NotFound,
    /// The request failed; the message is shown verbatim.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn from_result(result: RequestResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.message()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Navigable locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Video(String),
    Login,
    AdminUpload,
    Saved,
}

impl Route {
    /// Path form of the route. Video identifiers are percent-encoded so any
    /// id is a single path segment.
    pub fn path(&self) -> String {
        match self {
            Self::Catalog => "/".to_string(),
            Self::Video(id) => format!("/video/{}", urlencoding::encode(id)),
            Self::Login => "/login".to_string(),
            Self::AdminUpload => "/admin/upload".to_string(),
            Self::Saved => "/saved".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation capability handed to views that redirect.
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

/// Navigator that records the history; the host follows `current()`.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn current(&self) -> Option<Route> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, route: Route) {
        tracing::debug!(path = %route, "Navigate");
        self.history.lock().push(route);
    }
}
