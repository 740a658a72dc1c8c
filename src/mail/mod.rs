//! Outbound activation mail.
//!
//! `from_config` picks the sender once at startup: SMTP when a `mail`
//! section is configured, otherwise a sender that only logs the link.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MailConfig;

mod log_notifier;
mod smtp;

pub use log_notifier::LogMailNotifier;
pub use smtp::SmtpMailNotifier;

pub const ACTIVATION_SUBJECT: &str = "Account activation";

/// Delivery of the activation link. Errors are reported, never retried.
#[async_trait]
pub trait MailNotifier: Send + Sync {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> anyhow::Result<()>;
}

pub fn from_config(cfg: Option<&MailConfig>) -> anyhow::Result<Arc<dyn MailNotifier>> {
    match cfg {
        Some(cfg) => {
            tracing::info!(host = %cfg.smtp_host, port = cfg.smtp_port, "using smtp mail notifier");
            Ok(Arc::new(SmtpMailNotifier::new(cfg)?))
        }
        None => {
            tracing::warn!("no mail section configured, activation links will only be logged");
            Ok(Arc::new(LogMailNotifier))
        }
    }
}

pub(crate) fn activation_html(activation_url: &str) -> String {
    format!(
        "<div>\
         <h1>Activate your account</h1>\
         <p>Follow the link below to finish registration:</p>\
         <a href=\"{activation_url}\">{activation_url}</a>\
         </div>"
    )
}
