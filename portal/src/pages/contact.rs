use crate::email_client::EmailClient;
use crate::error::{ApiError, ApiResult, ValidationError};
use crate::notify::{Notice, Notifier};
use interfacing::ContactForm;

/// Field errors keyed by form field name, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors(pub Vec<(&'static str, ValidationError)>);

impl ContactErrors {
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0
            .iter()
            .find_map(|(name, error)| (*name == field).then_some(error))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Something shaped like `x@y.z` anywhere in the value.
fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|word| {
        word.match_indices('@').any(|(at, _)| {
            let domain = &word[at + 1..];
            at > 0
                && domain
                    .match_indices('.')
                    .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
        })
    })
}

/// Phone is the only optional field.
pub fn validate_contact(form: &ContactForm) -> Result<(), ContactErrors> {
    let mut errors = Vec::new();
    let mut require = |field: &'static str, value: &str, label: &'static str| {
        if value.trim().is_empty() {
            errors.push((field, ValidationError::Required(label)));
            false
        } else {
            true
        }
    };

    require("nombres", &form.first_names, "nombre");
    require("apellidos", &form.last_names, "apellido");
    let has_email = require("email", &form.email, "email");
    require("asunto", &form.subject, "asunto");
    require("comentarios", &form.comments, "comentario");

    if has_email && !looks_like_email(&form.email) {
        errors.push(("email", ValidationError::InvalidEmail));
        errors.sort_by_key(|(field, _)| field_order(field));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ContactErrors(errors))
    }
}

fn field_order(field: &str) -> usize {
    ["nombres", "apellidos", "email", "telefono", "asunto", "comentarios"]
        .iter()
        .position(|name| *name == field)
        .unwrap_or(usize::MAX)
}

/// Validates and sends a contact message. Every field error is reported;
/// the first one is returned.
#[tracing::instrument(name = "Submit contact form", skip_all)]
pub async fn send_contact(
    email_client: &EmailClient,
    form: &ContactForm,
    notifier: &dyn Notifier,
) -> ApiResult<()> {
    if let Err(ContactErrors(errors)) = validate_contact(form) {
        for (_, error) in &errors {
            notifier.notify(Notice::error(error.to_string()));
        }
        let first = errors
            .into_iter()
            .next()
            .map(|(_, error)| error)
            .unwrap_or(ValidationError::MissingField("formulario"));
        return Err(first.into());
    }

    if let Err(e) = email_client.send_contact(form).await {
        tracing::error!(error = %e, "Failed to deliver contact message");
        notifier.notify(Notice::error(
            "Hubo un error al enviar el mensaje. Por favor intenta nuevamente.",
        ));
        return Err(ApiError::Network(e));
    }

    notifier.notify(Notice::success(
        "¡Mensaje Enviado! Gracias por contactarnos. Hemos recibido su solicitud y le responderemos pronto.",
    ));
    Ok(())
}
