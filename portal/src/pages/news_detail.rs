use super::PostCard;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::notify::{Notice, Notifier};
use interfacing::NewsPost;
use std::sync::Arc;

/// Cap on the "more news" section under a post.
pub const RELATED_POSTS: usize = 3;

const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    NotFound,
    Loaded(NewsDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsDetail {
    pub post: NewsPost,
    pub related: Vec<PostCard>,
}

impl NewsDetail {
    pub fn category(&self) -> &str {
        self.post.category_label("Comunicado")
    }

    /// Post body ready to render, line breaks kept.
    pub fn body_html(&self) -> String {
        self.post.body.replace('\n', "<br />")
    }
}

/// Other posts to suggest next to `current`.
pub fn related_posts(all: Vec<NewsPost>, current: u64) -> Vec<NewsPost> {
    all.into_iter()
        .filter(|post| post.id != current)
        .take(RELATED_POSTS)
        .collect()
}

/// Detail page. Reloads whenever it is pointed at another post.
pub struct NewsDetailView {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    current: Option<u64>,
    state: DetailState,
}

impl NewsDetailView {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            current: None,
            state: DetailState::Loading,
        }
    }

    pub fn current(&self) -> Option<u64> {
        self.current
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    #[tracing::instrument(name = "Show news post", skip(self))]
    pub async fn navigate(&mut self, id: u64) -> &DetailState {
        self.current = Some(id);
        self.state = DetailState::Loading;

        let post = match self.client.get_news(id).await {
            Ok(post) => post,
            Err(e) => {
                if !matches!(e, ApiError::NotFound) {
                    tracing::warn!(error = %e, "Failed to load news post");
                    self.notifier.notify(Notice::error(e.user_message()));
                }
                self.state = DetailState::NotFound;
                return &self.state;
            }
        };

        // Without the full list the post is still shown, only without
        // suggestions.
        let related = match self.client.list_news().await {
            Ok(all) => related_posts(all, id)
                .iter()
                .map(|post| PostCard::new(post, &self.client, EXCERPT_CHARS, "Noticia"))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load related posts");
                Vec::new()
            }
        };

        self.state = DetailState::Loaded(NewsDetail { post, related });
        &self.state
    }
}
