use super::request::ApiRequest;
use super::routes::routes;
use crate::conf::ApiConf;
use crate::error::{ApiError, ApiResult};
use crate::session::{Credential, SessionHandle};
use anyhow::Context;
use interfacing::{RefreshRequest, RefreshResponse};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use url::Url;

/// Shared HTTP client for the REST backend.
///
/// Every request carries the `Authorization` header of the current session,
/// if any. A `401` is answered by exactly one token refresh followed by one
/// retry; when that is not possible the session is cleared and the call
/// fails with [`ApiError::SessionExpired`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(conf: &ApiConf, session: SessionHandle) -> ApiResult<Self> {
        let mut base = conf.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .with_context(|| format!("Invalid API base address {}", conf.base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(conf.timeout())
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Read access to the session context.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn url(&self, path: &str) -> ApiResult<Url> {
        Ok(self
            .base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid API path {}", path))?)
    }

    /// Absolute address of a stored media file. Absolute links are kept,
    /// relative ones (`/media/...`) are resolved against the base address.
    pub fn media_url(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http") {
            return Some(path.to_string());
        }
        self.url(path).ok().map(String::from)
    }

    #[tracing::instrument(
        name = "API request",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn send(&self, request: ApiRequest) -> ApiResult<Response> {
        let credential = self.session.access().await;
        let response = self.dispatch(&request, credential.as_ref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(refresh) = self.session.refresh_token().await else {
            tracing::info!("401 without a refresh token");
            return Err(ApiError::Unauthenticated);
        };

        let access = match self.refresh_access(refresh).await {
            Ok(access) => access,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, closing the session");
                self.session.clear().await?;
                return Err(ApiError::SessionExpired);
            }
        };

        self.session.replace_access(access).await?;

        let credential = self.session.access().await;
        let retried = self.dispatch(&request, credential.as_ref()).await?;

        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Retried request rejected, closing the session");
            self.session.clear().await?;
            return Err(ApiError::SessionExpired);
        }

        Ok(retried)
    }

    /// Sends without credentials and without the refresh path.
    pub(crate) async fn send_anonymous(&self, request: ApiRequest) -> ApiResult<Response> {
        self.dispatch(&request, None).await
    }

    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let response = self.send(request).await?;
        parse(response).await
    }

    pub async fn send_expecting_success(&self, request: ApiRequest) -> ApiResult<()> {
        let response = self.send(request).await?;
        check(response).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> ApiResult<Response> {
        let url = self.url(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if let Some(credential) = credential {
            builder = builder.header(header::AUTHORIZATION, credential.header_value());
        }

        let response = request.apply(builder)?.send().await?;
        tracing::debug!(status = %response.status());
        Ok(response)
    }

    #[tracing::instrument(name = "Refresh access token", skip_all)]
    async fn refresh_access(&self, refresh: SecretString) -> ApiResult<SecretString> {
        let response = self
            .http
            .post(self.url(routes().jwt_refresh)?)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;

        let refreshed: RefreshResponse = parse(response).await?;
        Ok(refreshed.access)
    }
}

/// Maps a non-success status to an error, keeping successful responses.
pub(crate) async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

pub(crate) async fn parse<R: DeserializeOwned>(response: Response) -> ApiResult<R> {
    check(response)
        .await?
        .json::<R>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
}
