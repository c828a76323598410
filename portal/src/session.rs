//! Session context shared by the HTTP client wrapper, the admin flow and the
//! admin panels.
//!
//! [`SessionHandle`] is the only owner of the in-memory session. Everything
//! outside this crate reads it; writes are reserved to the login flow and to
//! the client wrapper's refresh path.

use crate::error::{ApiError, ApiResult};
use anyhow::Context;
use derive_more::Display;
use interfacing::{expose_optional_secret_string, expose_secret_string};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Authorization header prefix of a credential.
#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    #[display(fmt = "Token")]
    Token,
    #[display(fmt = "JWT")]
    Jwt,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credential {
    pub scheme: AuthScheme,
    #[serde(serialize_with = "expose_secret_string")]
    token: SecretString,
}

impl Credential {
    pub fn new(scheme: AuthScheme, token: SecretString) -> Self {
        Self { scheme, token }
    }

    pub fn is_empty(&self) -> bool {
        self.token.expose_secret().trim().is_empty()
    }

    /// Value of the `Authorization` header, e.g. `Token abc` or `JWT abc`.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.token.expose_secret())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    pub access: Credential,
    #[serde(default, serialize_with = "expose_optional_secret_string")]
    pub refresh: Option<SecretString>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Session {
    /// Session issued by the token endpoint. It has no refresh token.
    pub fn token(token: SecretString, username: Option<String>) -> Self {
        Self {
            access: Credential::new(AuthScheme::Token, token),
            refresh: None,
            username,
        }
    }

    /// Session made of a JWT access/refresh pair.
    pub fn jwt(access: SecretString, refresh: SecretString, username: Option<String>) -> Self {
        Self {
            access: Credential::new(AuthScheme::Jwt, access),
            refresh: Some(refresh),
            username,
        }
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }
}

/// Persistence behind [`SessionHandle`].
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn load(&self) -> anyhow::Result<Option<Session>>;
    async fn save(&self, session: &Session) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

/// Keeps the session in a JSON file between runs.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> anyhow::Result<Option<Session>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let session = serde_json::from_slice(&contents)
            .with_context(|| format!("Malformed session file {}", self.path.display()))?;

        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_vec_pretty(session).context("Failed to encode session")?;

        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    /// What a restart would find.
    pub async fn stored(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// Picks up whatever session was persisted. The token is trusted as is,
    /// protected endpoints re-validate it on every call.
    #[tracing::instrument(name = "Restore session", skip_all)]
    pub async fn restore(store: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let session = store
            .load()
            .await
            .map_err(ApiError::Session)?
            .filter(|session| !session.access.is_empty());

        tracing::debug!(restored = session.is_some());

        Ok(Self {
            store,
            current: Arc::new(RwLock::new(session)),
        })
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn access(&self) -> Option<Credential> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.access.clone())
    }

    pub async fn refresh_token(&self) -> Option<SecretString> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(|session| session.refresh_token().cloned())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub(crate) async fn establish(&self, session: Session) -> ApiResult<()> {
        self.store.save(&session).await.map_err(ApiError::Session)?;
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Swaps the access token in place, keeping its scheme.
    pub(crate) async fn replace_access(&self, token: SecretString) -> ApiResult<()> {
        let mut current = self.current.write().await;
        let session = current.as_mut().ok_or(ApiError::Unauthenticated)?;
        session.access = Credential::new(session.access.scheme, token);
        self.store.save(session).await.map_err(ApiError::Session)
    }

    pub(crate) async fn clear(&self) -> ApiResult<()> {
        *self.current.write().await = None;
        self.store.clear().await.map_err(ApiError::Session)
    }
}
