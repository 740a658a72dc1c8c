pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, LogFormat, LoggingConfig, MailConfig,
};
pub use envconfig::EnvConfig;
