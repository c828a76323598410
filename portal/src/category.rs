//! Category handling shared by the public views.
//!
//! Two matching rules live side by side on purpose: filters and groupings
//! compare names exactly, visual styling matches a keyword anywhere in the
//! name. Renaming a category on the server can therefore move a document to
//! "other" styling while it still appears in its exact-match group.

use interfacing::FileCategory;

/// Label of the wildcard entry in the category selector.
pub const ALL_CATEGORIES: &str = "Todas";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Selector value as shown to the user. `Todas` and an empty selection
    /// mean no filtering.
    pub fn from_selection(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() || selection == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(selection.to_string())
        }
    }

    pub fn matches(&self, category_name: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => category_name == Some(name.as_str()),
        }
    }
}

/// Visual treatment of a file, picked from its category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStyle {
    NewEnrollment,
    ReEnrollment,
    Other,
}

impl CategoryStyle {
    pub fn of(category_name: &str) -> Self {
        let name = category_name.to_lowercase();
        if name.contains("nuevo") {
            Self::NewEnrollment
        } else if name.contains("reingreso") {
            Self::ReEnrollment
        } else {
            Self::Other
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Self::NewEnrollment => "NUEVO INGRESO",
            Self::ReEnrollment => "REINGRESO",
            Self::Other => "DOCUMENTO",
        }
    }
}

impl From<FileCategory> for CategoryStyle {
    fn from(category: FileCategory) -> Self {
        Self::of(category.as_str())
    }
}
