//! Public read views. Each one fetches on load and ends up in one of the
//! [`ViewState`] variants; a failed fetch is reported and shown as empty.

mod admissions;
mod contact;
mod landing;
mod news_detail;
mod news_list;
mod requirements;

pub use admissions::{Admissions, Download};
pub use contact::{send_contact, validate_contact, ContactErrors};
pub use landing::{landing, LANDING_POSTS};
pub use news_detail::{related_posts, DetailState, NewsDetail, NewsDetailView, RELATED_POSTS};
pub use news_list::{filter_news, NewsFilter, NewsList, NO_RESULTS};
pub use requirements::{Requirement, REQUIREMENTS_PRIMARY, REQUIREMENTS_SECONDARY};

use crate::api::ApiClient;
use crate::text::excerpt;
use interfacing::{DateTime, NewsPost, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Empty,
    Populated(T),
}

impl<T> ViewState<Vec<T>> {
    pub fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Populated(items)
        }
    }
}

impl<T> ViewState<T> {
    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(value) => Some(value),
            _ => None,
        }
    }
}

/// A news post summarized for a list.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl PostCard {
    pub fn new(post: &NewsPost, client: &ApiClient, excerpt_chars: usize, fallback: &str) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            category: post.category_label(fallback).to_string(),
            excerpt: excerpt(&post.body, excerpt_chars),
            image: post.image.as_deref().and_then(|path| client.media_url(path)),
            published_at: post.published_at,
        }
    }
}

/// Day, short month and year, e.g. `16 sept 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    const MONTHS: [&str; 12] = [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ];
    use chrono::Datelike;

    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}
