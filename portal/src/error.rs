/// Problems caught locally, before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Solo se permiten archivos PDF.")]
    NotPdf,

    #[error("El archivo es demasiado pesado (Máx 5MB).")]
    FileTooLarge,

    #[error("Seleccione un archivo PDF.")]
    NoFileSelected,

    #[error("Por favor complete el título y la categoría.")]
    MissingTitleOrCategory,

    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),

    #[error("El {0} es obligatorio")]
    Required(&'static str),

    #[error("El email no es válido")]
    InvalidEmail,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Entry not found")]
    NotFound,

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Session(#[source] anyhow::Error),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl ApiError {
    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Unauthenticated => "Inicie sesión para continuar.".into(),
            Self::SessionExpired => "Sesión caducada, inicie sesión nuevamente.".into(),
            Self::InvalidCredentials => {
                "Credenciales incorrectas. Verifique usuario y contraseña.".into()
            }
            Self::NotFound => "Contenido no encontrado".into(),
            Self::Server { .. } | Self::Decode(_) => {
                "Error del servidor. Verifique los campos o su sesión.".into()
            }
            Self::Network(_) => "Error de conexión con el servidor.".into(),
            Self::Session(_) | Self::UnexpectedError(_) => "Error inesperado.".into(),
        }
    }

    /// Whether the error means the user has to log in (again).
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::SessionExpired | Self::InvalidCredentials
        )
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
