use std::sync::Arc;

use super::form::{FormCell, SubmitError, SubmitPhase};
use super::{Navigator, Route};
use crate::graphql::ApiClient;
use crate::storage::{save_credential, KeyValueStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn with_username(self, username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..self
        }
    }

    pub fn with_password(self, password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored and navigation to the catalog issued.
    SignedIn,
    /// The server answered without a token. Nothing stored.
    NoToken,
}

/// Sign-in form: exchanges username and password for a stored token.
pub struct LoginView {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    form: FormCell<LoginForm>,
}

impl LoginView {
    pub fn new(
        client: ApiClient,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            store,
            navigator,
            form: FormCell::new(LoginForm::default()),
        }
    }

    pub fn form(&self) -> &FormCell<LoginForm> {
        &self.form
    }

    pub fn edit(&self, edit: impl FnOnce(LoginForm) -> LoginForm) {
        self.form.update(edit);
    }

    /// Error message of the last failed attempt.
    pub fn error(&self) -> Option<String> {
        match self.form.phase() {
            SubmitPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub async fn submit(&self) -> Result<LoginOutcome, SubmitError> {
        let form = self.form.begin()?;
        tracing::debug!(username = %form.username, "Signing in");

        let token = match self.client.token_auth(&form.username, &form.password).await {
            Ok(token) => token,
            Err(e) => {
                let message = e.message();
                self.form.finish(SubmitPhase::Failed(message.clone()));
                return Err(SubmitError::Request(message));
            }
        };

        let Some(token) = token else {
            self.form.finish(SubmitPhase::Idle);
            return Ok(LoginOutcome::NoToken);
        };

        if let Err(e) = save_credential(self.store.as_ref(), &token).await {
            let message = format!("{e:#}");
            self.form.finish(SubmitPhase::Failed(message.clone()));
            return Err(SubmitError::Request(message));
        }

        self.form.finish(SubmitPhase::Succeeded);
        tracing::info!(username = %form.username, "Signed in");
        self.navigator.push(Route::Catalog);
        Ok(LoginOutcome::SignedIn)
    }
}
