// Configuration definitions, functions and tests
//

use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string as de_num;
use std::sync::Arc;

static ENV_PREFIX: &str = "PORTAL";

fn prefixed_env(suffix: &str) -> String {
    format!("{}__{}", ENV_PREFIX, suffix)
}

#[derive(Clone, derived_deref::Deref)]
pub struct Conf {
    #[target]
    pub env_conf: Arc<EnvConf>,
    pub env: Env,
}

impl Conf {
    pub fn new(env: Env, env_conf: EnvConf) -> Self {
        Self {
            env_conf: Arc::new(env_conf),
            env,
        }
    }

    /// Resolves the environment and loads its configuration layers.
    pub fn derive() -> Result<Self, ConfError> {
        let env = Env::derive().map_err(ConfError::Env)?;
        let env_conf = EnvConf::derive(env)?;
        Ok(Self::new(env, env_conf))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfError {
    #[error("{0}")]
    Env(String),

    #[error("Configuration is rejected: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct EnvConf {
    pub api: ApiConf,
    pub session: SessionConf,
    pub email: EmailConf,
    pub log: Log,
}

/// Where the REST backend lives. Replaces picking the address from the
/// browser's host name.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiConf {
    pub base_url: String,
    #[serde(deserialize_with = "de_num")]
    pub timeout_milliseconds: u64,
}

impl ApiConf {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SessionConf {
    pub path: std::path::PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EmailConf {
    pub base_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: SecretString,
    #[serde(deserialize_with = "de_num")]
    pub timeout_milliseconds: u64,
}

impl EmailConf {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub pretty: bool,
}

impl EnvConf {
    pub fn derive(env: Env) -> Result<Self, ConfError> {
        let conf_dir = match std::env::var(prefixed_env("CONF_DIR")) {
            Ok(dir) => std::path::PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map_err(ConfError::CurrentDir)?
                .join("conf"),
        };

        let conf = config::Config::builder()
            .add_source(config::File::from(conf_dir.join("default")).required(true))
            .add_source(config::File::from(conf_dir.join(env.as_ref())).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(conf.try_deserialize()?)
    }

    pub fn test_default() -> Self {
        Self {
            api: ApiConf {
                base_url: "http://127.0.0.1:8000/".into(),
                timeout_milliseconds: 5000,
            },
            session: SessionConf {
                path: std::env::temp_dir().join("portal-test-session.json"),
            },
            email: EmailConf {
                base_url: "http://127.0.0.1:8001".into(),
                service_id: "service_test".into(),
                template_id: "template_test".into(),
                public_key: SecretString::new("public-key".into()),
                timeout_milliseconds: 2000,
            },
            log: Log { pretty: false },
        }
    }
}

use derive_more::Display;

#[derive(Debug, PartialEq, Display, Clone, Copy)]
pub enum Env {
    #[display(fmt = "local")]
    Local,
    #[display(fmt = "prod")]
    Prod,
}

impl Env {
    pub fn derive() -> Result<Self, String> {
        // One variable for the whole site
        let glob_env = std::env::var("SITE_ENV").unwrap_or_else(|_| "local".into());

        // Or set a more specific one for the portal
        std::env::var(prefixed_env("ENV"))
            .unwrap_or(glob_env)
            .try_into()
    }
}

impl AsRef<str> for Env {
    fn as_ref(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `prod`.",
                other
            )),
        }
    }
}
