//! Admin ingestion of a file already placed on the backend host.
//!
//! The operator copies the media into the backend container first, e.g.
//! `docker cp /path/to/movie.mp4 maxstudio_backend:/tmp/movie.mp4`, then
//! submits that path. Access control is left to the backend.

use super::form::{FormCell, SubmitError, SubmitPhase};
use crate::graphql::{ApiClient, IngestionRequest};

/// Reminder shown wherever the operator supplies the server path.
pub const SERVER_PATH_HINT: &str = "The file must already be on the backend host. Copy it in first, e.g.\n  docker cp /path/to/movie.mp4 maxstudio_backend:/tmp/movie.mp4\nthen pass --file /tmp/movie.mp4";

/// Confirmation shown once the backend acknowledges the request.
pub const ACCEPTED_NOTICE: &str = "Upload requested. Library refresh may take a moment.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestForm {
    pub title: String,
    pub description: String,
    pub genre_name: String,
    pub server_path: String,
}

impl IngestForm {
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_genre_name(self, genre_name: impl Into<String>) -> Self {
        Self {
            genre_name: genre_name.into(),
            ..self
        }
    }

    pub fn with_server_path(self, server_path: impl Into<String>) -> Self {
        Self {
            server_path: server_path.into(),
            ..self
        }
    }

    /// Build the mutation arguments. Title and path are required; empty
    /// optional fields are sent as absent.
    pub fn to_request(&self) -> Result<IngestionRequest, SubmitError> {
        if self.title.is_empty() {
            return Err(SubmitError::MissingField("title"));
        }
        if self.server_path.is_empty() {
            return Err(SubmitError::MissingField("server file path"));
        }
        Ok(IngestionRequest {
            title: self.title.clone(),
            file: self.server_path.clone(),
            description: non_empty(&self.description),
            genre_name: non_empty(&self.genre_name),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    /// The backend answered without `ok: true`.
    NotAcknowledged,
}

pub struct IngestView {
    client: ApiClient,
    form: FormCell<IngestForm>,
    notice: parking_lot::Mutex<Option<&'static str>>,
}

impl IngestView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            form: FormCell::new(IngestForm::default()),
            notice: parking_lot::Mutex::new(None),
        }
    }

    pub fn form(&self) -> &FormCell<IngestForm> {
        &self.form
    }

    pub fn edit(&self, edit: impl FnOnce(IngestForm) -> IngestForm) {
        self.form.update(edit);
    }

    pub fn notice(&self) -> Option<&'static str> {
        *self.notice.lock()
    }

    pub fn error(&self) -> Option<String> {
        match self.form.phase() {
            SubmitPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub async fn submit(&self) -> Result<IngestOutcome, SubmitError> {
        let form = self.form.begin()?;
        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.form.finish(SubmitPhase::Idle);
                return Err(e);
            }
        };
        *self.notice.lock() = None;

        tracing::info!(title = %request.title, file = %request.file, "Requesting ingestion");
        match self.client.upload_video(&request).await {
            Ok(true) => {
                self.form.finish(SubmitPhase::Succeeded);
                *self.notice.lock() = Some(ACCEPTED_NOTICE);
                Ok(IngestOutcome::Accepted)
            }
            Ok(false) => {
                self.form.finish(SubmitPhase::Idle);
                Ok(IngestOutcome::NotAcknowledged)
            }
            Err(e) => {
                let message = e.message();
                tracing::warn!(error = %message, "Ingestion request failed");
                self.form.finish(SubmitPhase::Failed(message.clone()));
                Err(SubmitError::Request(message))
            }
        }
    }
}
