use crate::imports::*;

/// A news post as served by `/api/noticias/`.
///
/// `category_name` is a read-only projection added by the server next to the
/// category foreign key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewsPost {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "contenido")]
    pub body: String,
    #[serde(rename = "categoria")]
    pub category: u64,
    #[serde(rename = "categoria_nombre", default)]
    pub category_name: Option<String>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
    #[serde(rename = "fecha_publicacion", deserialize_with = "deserialize_timestamp")]
    pub published_at: DateTime<Utc>,
}

impl NewsPost {
    pub fn category_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.category_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }
}
