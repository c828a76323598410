//! Admin login flow.
//!
//! Two states: without a session the console only offers the login form,
//! with one it exposes the admin panels. The state is read from the session
//! context on every call, so a session closed by the client wrapper after a
//! failed refresh is seen here immediately.

use crate::api::{routes, ApiClient};
use crate::error::{ApiResult, ValidationError};
use crate::session::Session;
use interfacing::LoginForm;
use secrecy::ExposeSecret;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { username: Option<String> },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

pub struct AdminAuth {
    client: ApiClient,
}

impl AdminAuth {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn state(&self) -> AuthState {
        match self.client.session().current().await {
            None => AuthState::Unauthenticated,
            Some(session) => AuthState::Authenticated {
                username: session.username,
            },
        }
    }

    #[tracing::instrument(name = "Admin login", skip(self, form), fields(username = %form.username))]
    pub async fn login(&self, form: LoginForm) -> ApiResult<AuthState> {
        if form.username.trim().is_empty() {
            return Err(ValidationError::MissingField("usuario").into());
        }
        if form.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingField("contraseña").into());
        }

        let response = self.client.obtain_token(&form).await?;

        self.client
            .session()
            .establish(Session::token(response.token, Some(form.username.clone())))
            .await?;

        tracing::info!("Admin session established");

        Ok(AuthState::Authenticated {
            username: Some(form.username),
        })
    }

    #[tracing::instrument(name = "Admin logout", skip(self))]
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.session().clear().await
    }

    /// Backend page where a forgotten password can be reset.
    pub fn password_reset_url(&self) -> ApiResult<url::Url> {
        self.client.url(routes().password_reset)
    }
}
