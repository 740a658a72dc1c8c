use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::debug;

use super::{ACTIVATION_SUBJECT, MailNotifier, activation_html};
use crate::config::MailConfig;

pub struct SmtpMailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailNotifier {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let from = cfg
            .sender()
            .parse::<Mailbox>()
            .with_context(|| format!("invalid sender address: {}", cfg.sender()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .with_context(|| format!("failed to build smtp relay for {}", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(
                cfg.smtp_user.clone(),
                cfg.smtp_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailNotifier for SmtpMailNotifier {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> anyhow::Result<()> {
        let to = to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient address: {to}"))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(ACTIVATION_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(activation_html(activation_url))
            .context("failed to build activation mail")?;

        let response = self
            .transport
            .send(message)
            .await
            .context("smtp delivery failed")?;
        debug!(code = %response.code(), "activation mail accepted by relay");
        Ok(())
    }
}
