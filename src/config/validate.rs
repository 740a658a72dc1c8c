use anyhow::{Result, bail};

use super::{AppConfig, defaults};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    let api_url = cfg.general.api_url.trim();
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        errors.push(format!(
            "general.api_url ({api_url}) must start with http:// or https://"
        ));
    }

    if cfg
        .general
        .client_url
        .as_deref()
        .is_some_and(|url| url.trim().is_empty())
    {
        errors.push("general.client_url must not be empty when set".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    let auth = &cfg.auth;
    if auth.access_secret.trim().is_empty() {
        errors.push("auth.access_secret must not be empty".to_string());
    }

    if auth.refresh_secret.trim().is_empty() {
        errors.push("auth.refresh_secret must not be empty".to_string());
    }

    if !auth.access_secret.is_empty() && auth.access_secret == auth.refresh_secret {
        errors.push("auth.access_secret and auth.refresh_secret must differ".to_string());
    }

    if auth.access_ttl_secs == 0 {
        errors.push("auth.access_ttl_secs must be > 0".to_string());
    }

    if auth.refresh_ttl_days == 0 {
        errors.push("auth.refresh_ttl_days must be > 0".to_string());
    }

    if !cfg!(debug_assertions)
        && (auth.access_secret == defaults::DEFAULT_ACCESS_SECRET
            || auth.refresh_secret == defaults::DEFAULT_REFRESH_SECRET)
    {
        errors.push("auth secrets must be overridden in release builds".to_string());
    }

    if let Some(mail) = cfg.mail.as_ref() {
        if mail.smtp_host.trim().is_empty() {
            errors.push("mail.smtp_host must not be empty".to_string());
        }

        if mail.sender().trim().is_empty() {
            errors.push("mail.from or mail.smtp_user must be set".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
