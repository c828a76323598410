use crate::api::ApiClient;
use crate::error::ApiResult;

/// Counters on the admin home panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub news: usize,
    pub files: usize,
}

impl DashboardStats {
    /// Fetches both collections at once and counts them.
    #[tracing::instrument(name = "Fetch dashboard stats", skip(client))]
    pub async fn fetch(client: &ApiClient) -> ApiResult<Self> {
        let (news, files) = tokio::try_join!(client.list_news(), client.list_files())?;

        Ok(Self {
            news: news.len(),
            files: files.len(),
        })
    }
}
