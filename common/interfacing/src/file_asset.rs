use crate::imports::*;

/// An uploaded document as served by `/api/archivos/`.
///
/// `category` stays a plain string: it is displayed and grouped as the server
/// sends it, uploads go through [`FileCategory`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FileAsset {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "archivo_pdf")]
    pub file: String,
    #[serde(rename = "fecha_subida", deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub size_formatted: Option<String>,
}

/// The fixed set of document categories accepted on upload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileCategory {
    #[serde(rename = "Planilla reingreso")]
    ReEnrollment,
    #[serde(rename = "Planilla nuevo ingreso")]
    NewEnrollment,
    #[serde(rename = "Otro")]
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 3] = [Self::ReEnrollment, Self::NewEnrollment, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReEnrollment => "Planilla reingreso",
            Self::NewEnrollment => "Planilla nuevo ingreso",
            Self::Other => "Otro",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("{} is not a known file category", s))
    }
}
