use crate::error::ApiResult;
use anyhow::Context;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;

/// Description of a request that can be turned into a `reqwest` request
/// more than once, so it survives a token refresh and retry.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

#[derive(Clone, Debug)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        self.body = Body::Json(serde_json::to_value(body).context("Failed to encode request body")?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> ApiResult<reqwest::RequestBuilder> {
        Ok(match &self.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(form) => builder.multipart(form.build()?),
        })
    }
}

#[derive(Clone, Debug)]
enum Part {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Bytes,
    },
}

/// Owned multipart body.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
    parts: Vec<(String, Part)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), Part::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        self.parts.push((
            name.into(),
            Part::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        ));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_names().any(|field| field == name)
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(field, part)| match part {
            Part::Text(value) if field == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn build(&self) -> ApiResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for (name, part) in &self.parts {
            form = match part {
                Part::Text(value) => form.text(name.clone(), value.clone()),
                Part::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .with_context(|| format!("Invalid mime type {}", mime))?;
                    form.part(name.clone(), part)
                }
            };
        }

        Ok(form)
    }
}
