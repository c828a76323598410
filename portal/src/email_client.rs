use crate::conf::EmailConf;
use interfacing::ContactForm;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

/// Client of the third-party email delivery REST API used by the contact
/// page.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    service_id: String,
    template_id: String,
    public_key: SecretString,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        service_id: String,
        template_id: String,
        public_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            service_id,
            template_id,
            public_key,
        })
    }

    pub fn from_conf(conf: &EmailConf) -> Result<Self, reqwest::Error> {
        Self::new(
            conf.base_url.clone(),
            conf.service_id.clone(),
            conf.template_id.clone(),
            conf.public_key.clone(),
            conf.timeout(),
        )
    }

    #[tracing::instrument(name = "Send contact message", skip_all, fields(subject = %form.subject))]
    pub async fn send_contact(&self, form: &ContactForm) -> Result<(), reqwest::Error> {
        let url = format!("{}/api/v1.0/email/send", self.base_url.trim_end_matches('/'));
        let request_body = SendEmailRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: self.public_key.expose_secret(),
            template_params: form,
        };

        self.http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ContactForm,
}
