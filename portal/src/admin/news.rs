use super::{ensure_session, failure_message, FileSelection};
use crate::api::{ApiClient, MultipartForm};
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::notify::{Confirm, Notice, Notifier};
use interfacing::{Category, NewsPost};
use std::sync::Arc;

const DISCARD_PROMPT: &str = "¿Descartar los cambios actuales?";
const DELETE_PROMPT: &str = "¿Estás seguro de eliminar esta noticia permanentemente?";

/// Create/edit form shared by both flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsForm {
    pub title: String,
    pub category: Option<u64>,
    pub body: String,
    /// Only set when the user picked a new file.
    pub image: Option<FileSelection>,
    /// Image currently stored for the post being edited.
    pub preview: Option<String>,
}

impl NewsForm {
    fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.body.is_empty()
    }

    /// Wraps the body characters `start..end` with `open` and `close` and
    /// returns where the cursor lands: right after the inserted markup,
    /// counted from the old selection end.
    ///
    /// Offsets are in characters and clamped to the body.
    pub fn wrap_selection(&mut self, start: usize, end: usize, open: &str, close: &str) -> usize {
        let len = self.body.chars().count();
        let end = end.min(len);
        let start = start.min(end);

        let byte = |offset: usize| {
            self.body
                .char_indices()
                .nth(offset)
                .map_or(self.body.len(), |(i, _)| i)
        };
        let (start_byte, end_byte) = (byte(start), byte(end));

        let mut body = String::with_capacity(self.body.len() + open.len() + close.len());
        body.push_str(&self.body[..start_byte]);
        body.push_str(open);
        body.push_str(&self.body[start_byte..end_byte]);
        body.push_str(close);
        body.push_str(&self.body[end_byte..]);
        self.body = body;

        end + open.chars().count() + close.chars().count()
    }

    pub fn to_multipart(&self) -> Result<MultipartForm, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("título"));
        }
        let category = self.category.ok_or(ValidationError::MissingField("categoría"))?;

        let mut form = MultipartForm::new()
            .text("titulo", self.title.clone())
            .text("contenido", self.body.clone())
            .text("categoria", category.to_string());

        if let Some(image) = &self.image {
            form = form.file(
                "imagen",
                image.name.clone(),
                image.content_type.clone(),
                image.bytes.clone(),
            );
        }

        Ok(form)
    }
}

/// Admin panel for news posts.
pub struct NewsManager {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    posts: Vec<NewsPost>,
    categories: Vec<Category>,
    form: NewsForm,
    editing_id: Option<u64>,
    submitting: bool,
}

impl NewsManager {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            posts: Vec::new(),
            categories: Vec::new(),
            form: NewsForm::default(),
            editing_id: None,
            submitting: false,
        }
    }

    pub fn posts(&self) -> &[NewsPost] {
        &self.posts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn form(&self) -> &NewsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewsForm {
        &mut self.form
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.editing_id
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fetches categories and posts. With no edit in progress the form
    /// category defaults to the first one.
    #[tracing::instrument(name = "Load news manager", skip(self))]
    pub async fn load(&mut self) -> ApiResult<()> {
        let fetched = tokio::try_join!(self.client.list_categories(), self.client.list_news());

        let (categories, posts) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load the news manager");
                self.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        self.categories = categories;
        self.posts = posts;
        if self.editing_id.is_none() {
            self.form.category = self.default_category();
        }
        Ok(())
    }

    /// Copies a post into the form. The stored image stays untouched unless
    /// a new one is picked.
    pub fn begin_edit(&mut self, id: u64) -> ApiResult<()> {
        let post = self
            .posts
            .iter()
            .find(|post| post.id == id)
            .ok_or(ApiError::NotFound)?;

        self.form = NewsForm {
            title: post.title.clone(),
            category: Some(post.category),
            body: post.body.clone(),
            image: None,
            preview: post.image.clone(),
        };
        self.editing_id = Some(id);
        Ok(())
    }

    /// Drops the form contents, asking first if there is anything to lose.
    /// Returns whether the form was reset.
    pub fn cancel(&mut self, confirm: &dyn Confirm) -> bool {
        if self.form.has_content() && !confirm.confirm(DISCARD_PROMPT) {
            return false;
        }
        self.reset();
        true
    }

    /// Creates a post, or updates the one being edited.
    #[tracing::instrument(name = "Submit news post", skip(self), fields(editing_id = ?self.editing_id))]
    pub async fn submit(&mut self) -> ApiResult<()> {
        ensure_session(&self.client).await?;

        let form = match self.form.to_multipart() {
            Ok(form) => form,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e.into());
            }
        };

        self.submitting = true;
        let result = match self.editing_id {
            Some(id) => self.client.update_news(id, form).await,
            None => self.client.create_news(form).await,
        };
        self.submitting = false;

        if let Err(e) = result {
            tracing::warn!(error = %e, "News post was not saved");
            self.notifier.notify(Notice::error(failure_message(
                &e,
                "Error al guardar. Verifique los campos o su sesión.",
                "Error de conexión",
            )));
            return Err(e);
        }

        self.notifier.notify(Notice::success(match self.editing_id {
            Some(_) => "Noticia actualizada con éxito",
            None => "Noticia publicada con éxito",
        }));
        self.reset();
        self.refresh_posts().await;
        Ok(())
    }

    /// Deletes a post after confirmation. Returns whether it was deleted.
    #[tracing::instrument(name = "Delete news post", skip(self, confirm))]
    pub async fn delete(&mut self, id: u64, confirm: &dyn Confirm) -> ApiResult<bool> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        ensure_session(&self.client).await?;

        if let Err(e) = self.client.delete_news(id).await {
            tracing::warn!(error = %e, "News post was not deleted");
            self.notifier.notify(Notice::error(failure_message(
                &e,
                "No se pudo eliminar la noticia. Verifique su sesión.",
                "Error de conexión",
            )));
            return Err(e);
        }

        self.posts.retain(|post| post.id != id);
        self.notifier.notify(Notice::success("Noticia eliminada"));
        if self.editing_id == Some(id) {
            self.reset();
        }
        Ok(true)
    }

    fn default_category(&self) -> Option<u64> {
        self.categories.first().map(|category| category.id)
    }

    fn reset(&mut self) {
        self.editing_id = None;
        self.form = NewsForm {
            category: self.default_category(),
            ..NewsForm::default()
        };
    }

    async fn refresh_posts(&mut self) {
        match self.client.list_news().await {
            Ok(posts) => self.posts = posts,
            Err(e) => tracing::warn!(error = %e, "Failed to refetch news posts"),
        }
    }
}
