/// Endpoint paths of the REST backend, relative to the configured base address.
pub struct Routes {
    pub news: &'static str,
    pub categories: &'static str,
    pub files: &'static str,
    pub token_auth: &'static str,
    pub jwt_refresh: &'static str,
    pub password_reset: &'static str,
}

pub fn routes() -> Routes {
    Routes {
        news: "api/noticias/",
        categories: "api/categorias/",
        files: "api/archivos/",
        token_auth: "api-token-auth/",
        jwt_refresh: "auth/jwt/refresh/",
        password_reset: "reset_password/",
    }
}

impl Routes {
    pub fn news_item(&self, id: u64) -> String {
        format!("{}{}/", self.news, id)
    }

    pub fn file_item(&self, id: u64) -> String {
        format!("{}{}/", self.files, id)
    }
}
