//! Account utilities: backend health, current account, and registration.

use super::form::SubmitError;
use super::ViewState;
use crate::graphql::operations::RegisterVariables;
use crate::graphql::{Account, ApiClient};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterForm {
    fn to_variables(&self) -> Result<RegisterVariables, SubmitError> {
        if self.username.is_empty() {
            return Err(SubmitError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(SubmitError::MissingField("password"));
        }
        Ok(RegisterVariables {
            username: self.username.clone(),
            password: self.password.clone(),
            email: (!self.email.is_empty()).then(|| self.email.clone()),
        })
    }
}

pub struct AccountView {
    client: ApiClient,
}

impl AccountView {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `Ready("ok")` when the backend answers its healthcheck.
    pub async fn health(&self) -> ViewState<String> {
        match self.client.healthcheck().await {
            Ok(Some(status)) => ViewState::Ready(status),
            Ok(None) => ViewState::NotFound,
            Err(e) => ViewState::Failed(e.message()),
        }
    }

    /// The signed-in account; `NotFound` when the request is anonymous.
    pub async fn whoami(&self) -> ViewState<Account> {
        match self.client.me().await {
            Ok(Some(account)) => ViewState::Ready(account),
            Ok(None) => ViewState::NotFound,
            Err(e) => ViewState::Failed(e.message()),
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<Option<Account>, SubmitError> {
        let variables = form.to_variables()?;
        let payload = self
            .client
            .register(&variables)
            .await
            .map_err(|e| SubmitError::Request(e.message()))?;
        if payload.ok != Some(true) {
            return Err(SubmitError::Request("Registration was not accepted".to_string()));
        }
        tracing::info!(username = %variables.username, "Account registered");
        Ok(payload.user)
    }
}
