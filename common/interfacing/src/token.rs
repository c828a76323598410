use crate::imports::*;

/// Response of `api-token-auth/`.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub token: SecretString,
}

/// Body of `auth/jwt/refresh/`.
#[derive(Serialize, Debug)]
pub struct RefreshRequest {
    #[serde(serialize_with = "expose_secret_string")]
    pub refresh: SecretString,
}

#[derive(Deserialize, Debug)]
pub struct RefreshResponse {
    pub access: SecretString,
}
