use super::{PostCard, ViewState};
use crate::api::ApiClient;
use crate::notify::{Notice, Notifier};

/// How many of the latest posts the home page shows.
pub const LANDING_POSTS: usize = 3;

const EXCERPT_CHARS: usize = 110;

/// Latest posts for the home page. The server lists newest first.
#[tracing::instrument(name = "Load landing page", skip_all)]
pub async fn landing(client: &ApiClient, notifier: &dyn Notifier) -> ViewState<Vec<PostCard>> {
    match client.list_news().await {
        Ok(posts) => ViewState::from_list(
            posts
                .iter()
                .take(LANDING_POSTS)
                .map(|post| PostCard::new(post, client, EXCERPT_CHARS, "Información"))
                .collect(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load the latest news");
            notifier.notify(Notice::error(e.user_message()));
            ViewState::Empty
        }
    }
}
