use super::ViewState;
use crate::api::ApiClient;
use crate::category::CategoryStyle;
use crate::notify::{Notice, Notifier};
use interfacing::{DateTime, FileAsset, FileCategory, Utc};

/// A document offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub size: String,
    pub style: CategoryStyle,
    pub uploaded_at: DateTime<Utc>,
}

impl Download {
    fn new(file: &FileAsset, client: &ApiClient) -> Self {
        Self {
            id: file.id,
            title: file.title.clone(),
            url: client.media_url(&file.file),
            size: file.size_formatted.clone().unwrap_or_else(|| "PDF".into()),
            style: CategoryStyle::of(&file.category),
            uploaded_at: file.uploaded_at,
        }
    }
}

/// The "trámites" page: enrollment forms grouped by exact category name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Admissions {
    pub new_enrollment: Vec<Download>,
    pub re_enrollment: Vec<Download>,
    pub other: Vec<Download>,
}

impl Admissions {
    /// Files whose category is none of the fixed names are not listed.
    pub fn group(files: &[FileAsset], client: &ApiClient) -> Self {
        let pick = |category: FileCategory| {
            files
                .iter()
                .filter(|file| file.category == category.as_str())
                .map(|file| Download::new(file, client))
                .collect::<Vec<_>>()
        };

        Self {
            new_enrollment: pick(FileCategory::NewEnrollment),
            re_enrollment: pick(FileCategory::ReEnrollment),
            other: pick(FileCategory::Other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_enrollment.is_empty() && self.re_enrollment.is_empty() && self.other.is_empty()
    }

    #[tracing::instrument(name = "Load admissions page", skip_all)]
    pub async fn load(client: &ApiClient, notifier: &dyn Notifier) -> ViewState<Self> {
        match client.list_files().await {
            Ok(files) => {
                let admissions = Self::group(&files, client);
                if admissions.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Populated(admissions)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load downloadable files");
                notifier.notify(Notice::error(e.user_message()));
                ViewState::Empty
            }
        }
    }
}
