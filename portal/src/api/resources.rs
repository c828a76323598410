use super::client::{parse, ApiClient};
use super::request::{ApiRequest, MultipartForm};
use super::routes::routes;
use crate::error::{ApiError, ApiResult};
use interfacing::{Category, FileAsset, LoginForm, NewsPost, TokenResponse};
use reqwest::StatusCode;

impl ApiClient {
    #[tracing::instrument(name = "Fetch news posts", skip(self))]
    pub async fn list_news(&self) -> ApiResult<Vec<NewsPost>> {
        self.send_json(ApiRequest::get(routes().news)).await
    }

    #[tracing::instrument(name = "Fetch news post", skip(self))]
    pub async fn get_news(&self, id: u64) -> ApiResult<NewsPost> {
        self.send_json(ApiRequest::get(routes().news_item(id))).await
    }

    #[tracing::instrument(name = "Create news post", skip_all)]
    pub async fn create_news(&self, form: MultipartForm) -> ApiResult<()> {
        self.send_expecting_success(ApiRequest::post(routes().news).multipart(form))
            .await
    }

    #[tracing::instrument(name = "Update news post", skip(self, form))]
    pub async fn update_news(&self, id: u64, form: MultipartForm) -> ApiResult<()> {
        self.send_expecting_success(ApiRequest::patch(routes().news_item(id)).multipart(form))
            .await
    }

    #[tracing::instrument(name = "Delete news post", skip(self))]
    pub async fn delete_news(&self, id: u64) -> ApiResult<()> {
        self.send_expecting_success(ApiRequest::delete(routes().news_item(id)))
            .await
    }

    #[tracing::instrument(name = "Fetch categories", skip(self))]
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.send_json(ApiRequest::get(routes().categories)).await
    }

    #[tracing::instrument(name = "Fetch files", skip(self))]
    pub async fn list_files(&self) -> ApiResult<Vec<FileAsset>> {
        self.send_json(ApiRequest::get(routes().files)).await
    }

    #[tracing::instrument(name = "Upload file", skip_all)]
    pub async fn upload_file(&self, form: MultipartForm) -> ApiResult<()> {
        self.send_expecting_success(ApiRequest::post(routes().files).multipart(form))
            .await
    }

    #[tracing::instrument(name = "Delete file", skip(self))]
    pub async fn delete_file(&self, id: u64) -> ApiResult<()> {
        self.send_expecting_success(ApiRequest::delete(routes().file_item(id)))
            .await
    }

    /// Exchanges credentials for an API token. Goes around the refresh
    /// path: a rejected login is never a stale session.
    #[tracing::instrument(
        name = "Obtain API token",
        skip(self, form),
        fields(username = %form.username)
    )]
    pub async fn obtain_token(&self, form: &LoginForm) -> ApiResult<TokenResponse> {
        let response = self
            .send_anonymous(ApiRequest::post(routes().token_auth).json(form)?)
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(ApiError::InvalidCredentials),
            _ => parse(response).await,
        }
    }
}
