use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL of this API, used to build activation links.
    pub api_url: String,
    /// Browser client origin. Enables credentialed CORS and the
    /// post-activation redirect.
    pub client_url: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            api_url: defaults::DEFAULT_API_URL.to_string(),
            client_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_days: u64,
    pub cookie_secure: bool,
}

impl AuthConfig {
    pub fn refresh_ttl_secs(&self) -> u64 {
        self.refresh_ttl_days * 24 * 60 * 60
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: defaults::DEFAULT_ACCESS_SECRET.to_string(),
            refresh_secret: defaults::DEFAULT_REFRESH_SECRET.to_string(),
            access_ttl_secs: defaults::DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_days: defaults::DEFAULT_REFRESH_TTL_DAYS,
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    /// Sender address; falls back to `smtp_user`.
    pub from: Option<String>,
}

impl MailConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.smtp_user)
    }
}

fn default_smtp_port() -> u16 {
    defaults::DEFAULT_SMTP_PORT
}
