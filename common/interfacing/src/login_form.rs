use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Credentials posted to the token endpoint.
#[derive(Deserialize, Clone, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

impl Serialize for LoginForm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("LoginForm", 2)?;
        s.serialize_field("username", &self.username)?;
        s.serialize_field("password", &self.password.expose_secret())?;
        s.end()
    }
}
