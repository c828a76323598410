//! Admin panels: the news and files managers and the dashboard counters.
//!
//! Each manager owns its fetched list and its form. Lists change locally only
//! after the server confirms a mutation.

mod dashboard;
mod files;
mod news;

pub use dashboard::DashboardStats;
pub use files::{admit, FilesManager, UploadState, MAX_UPLOAD_BYTES};
pub use news::{NewsForm, NewsManager};

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

/// A file picked by the user, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSelection {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} is not a file", path.display()))?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(Self::new(name, content_type, bytes.into()))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Refuses a mutation up front when there is no session to authorize it.
async fn ensure_session(client: &ApiClient) -> ApiResult<()> {
    if client.session().is_authenticated().await {
        Ok(())
    } else {
        Err(ApiError::Unauthenticated)
    }
}

/// Notification text for a failed mutation: `rejected` when the server said
/// no, `offline` when it could not be reached.
fn failure_message(error: &ApiError, rejected: &str, offline: &str) -> String {
    match error {
        ApiError::Network(_) => offline.to_string(),
        ApiError::Server { .. } | ApiError::NotFound | ApiError::Decode(_) => rejected.to_string(),
        other => other.user_message(),
    }
}
