use super::{PostCard, ViewState};
use crate::api::ApiClient;
use crate::category::CategoryFilter;
use crate::error::ApiResult;
use crate::notify::{Notice, Notifier};
use crate::text::plain_text;
use interfacing::{Category, NewsPost};

pub const NO_RESULTS: &str = "No se encontraron noticias con los criterios de búsqueda.";

const EXCERPT_CHARS: usize = 120;

/// Search box and category selector of the news list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl NewsFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Case-insensitive substring match on the title or the body text, and
    /// an exact category name match.
    pub fn matches(&self, post: &NewsPost) -> bool {
        if !self.category.matches(post.category_name.as_deref()) {
            return false;
        }

        let needle = self.search.to_lowercase();
        needle.is_empty()
            || post.title.to_lowercase().contains(&needle)
            || plain_text(&post.body).to_lowercase().contains(&needle)
    }
}

pub fn filter_news<'a>(posts: &'a [NewsPost], filter: &NewsFilter) -> Vec<&'a NewsPost> {
    posts.iter().filter(|post| filter.matches(post)).collect()
}

/// Everything the list page fetched. Filtering never refetches.
#[derive(Debug, Clone, Default)]
pub struct NewsList {
    pub posts: Vec<NewsPost>,
    pub categories: Vec<Category>,
}

impl NewsList {
    #[tracing::instrument(name = "Load news list", skip_all)]
    pub async fn fetch(client: &ApiClient) -> ApiResult<Self> {
        let posts = client.list_news().await?;
        let categories = client.list_categories().await?;
        Ok(Self { posts, categories })
    }

    /// Same as [`NewsList::fetch`], reporting a failure as an empty list.
    pub async fn load(client: &ApiClient, notifier: &dyn Notifier) -> Self {
        Self::fetch(client).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load the news list");
            notifier.notify(Notice::error(e.user_message()));
            Self::default()
        })
    }

    /// Names offered by the category selector, wildcard first.
    pub fn category_options(&self) -> Vec<&str> {
        std::iter::once(crate::category::ALL_CATEGORIES)
            .chain(self.categories.iter().map(|category| category.name.as_str()))
            .collect()
    }

    pub fn cards(&self, client: &ApiClient, filter: &NewsFilter) -> ViewState<Vec<PostCard>> {
        ViewState::from_list(
            filter_news(&self.posts, filter)
                .into_iter()
                .map(|post| PostCard::new(post, client, EXCERPT_CHARS, ""))
                .collect(),
        )
    }
}
