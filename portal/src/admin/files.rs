use super::{ensure_session, failure_message, FileSelection};
use crate::api::{ApiClient, MultipartForm};
use crate::error::{ApiResult, ValidationError};
use crate::notify::{Confirm, Notice, Notifier};
use interfacing::{FileAsset, FileCategory};
use std::sync::Arc;

/// Largest accepted upload, 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const PDF: &str = "application/pdf";
const DELETE_PROMPT: &str = "¿Estás seguro de eliminar este archivo?";

/// The pending upload and the reason it was last rejected, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub file: Option<FileSelection>,
    pub title: String,
    pub category: Option<FileCategory>,
    pub error: Option<String>,
}

impl UploadState {
    fn to_multipart(&self) -> Result<MultipartForm, ValidationError> {
        let file = self.file.as_ref().ok_or(ValidationError::NoFileSelected)?;
        let category = match self.category {
            Some(category) if !self.title.trim().is_empty() => category,
            _ => return Err(ValidationError::MissingTitleOrCategory),
        };

        Ok(MultipartForm::new()
            .text("titulo", self.title.clone())
            .text("categoria", category.as_str())
            .file(
                "archivo_pdf",
                file.name.clone(),
                file.content_type.clone(),
                file.bytes.clone(),
            ))
    }
}

/// Checks run on a picked file before it can become the pending upload.
pub fn admit(selection: &FileSelection) -> Result<(), ValidationError> {
    if selection.content_type != PDF {
        return Err(ValidationError::NotPdf);
    }
    if selection.size() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}

/// Admin panel for downloadable documents.
pub struct FilesManager {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    files: Vec<FileAsset>,
    upload: UploadState,
    uploading: bool,
}

impl FilesManager {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            files: Vec::new(),
            upload: UploadState::default(),
            uploading: false,
        }
    }

    pub fn files(&self) -> &[FileAsset] {
        &self.files
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.upload.title = title.into();
    }

    pub fn set_category(&mut self, category: FileCategory) {
        self.upload.category = Some(category);
    }

    #[tracing::instrument(name = "Load files manager", skip(self))]
    pub async fn load(&mut self) -> ApiResult<()> {
        match self.client.list_files().await {
            Ok(files) => {
                self.files = files;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load files");
                self.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Makes `selection` the pending upload if it passes the local checks.
    /// A rejected file leaves the previous pending upload in place.
    pub fn select_file(&mut self, selection: FileSelection) -> Result<(), ValidationError> {
        if let Err(e) = admit(&selection) {
            tracing::info!(file = %selection.name, reason = %e, "File rejected");
            self.upload.error = Some(e.to_string());
            return Err(e);
        }

        self.upload = UploadState {
            title: selection.name.replacen(".pdf", "", 1),
            file: Some(selection),
            category: None,
            error: None,
        };
        Ok(())
    }

    pub fn cancel_upload(&mut self) {
        self.upload = UploadState::default();
    }

    #[tracing::instrument(name = "Confirm upload", skip(self), fields(title = %self.upload.title))]
    pub async fn confirm_upload(&mut self) -> ApiResult<()> {
        let form = match self.upload.to_multipart() {
            Ok(form) => form,
            Err(e) => {
                self.upload.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        ensure_session(&self.client).await?;

        self.uploading = true;
        let result = self.client.upload_file(form).await;
        self.uploading = false;

        if let Err(e) = result {
            tracing::warn!(error = %e, "Upload failed");
            let message = failure_message(
                &e,
                "Error al subir. ¿Está iniciada la sesión?",
                "Error de conexión.",
            );
            self.upload.error = Some(message.clone());
            self.notifier.notify(Notice::error(message));
            return Err(e);
        }

        self.notifier
            .notify(Notice::success("Archivo subido correctamente"));
        self.cancel_upload();
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Failed to refetch files after upload");
        }
        Ok(())
    }

    /// Deletes a file after confirmation. Returns whether it was deleted.
    #[tracing::instrument(name = "Delete file", skip(self, confirm))]
    pub async fn delete(&mut self, id: u64, confirm: &dyn Confirm) -> ApiResult<bool> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        ensure_session(&self.client).await?;

        if let Err(e) = self.client.delete_file(id).await {
            tracing::warn!(error = %e, "File was not deleted");
            self.notifier.notify(Notice::error(failure_message(
                &e,
                "No se pudo eliminar. Verifique su sesión.",
                "Error de conexión.",
            )));
            return Err(e);
        }

        self.files.retain(|file| file.id != id);
        self.notifier.notify(Notice::success("Archivo eliminado"));
        Ok(true)
    }
}
