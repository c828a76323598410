use crate::imports::*;

/// Message left through the public contact page.
///
/// Field names on the wire are the template parameters of the email
/// delivery service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ContactForm {
    #[serde(rename = "nombres")]
    pub first_names: String,
    #[serde(rename = "apellidos")]
    pub last_names: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "comentarios")]
    pub comments: String,
}
