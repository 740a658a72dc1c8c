use async_trait::async_trait;
use tracing::info;

use super::MailNotifier;

/// Local dev sender that logs the link instead of sending mail.
#[derive(Clone, Debug, Default)]
pub struct LogMailNotifier;

#[async_trait]
impl MailNotifier for LogMailNotifier {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> anyhow::Result<()> {
        info!(to_email = %to, activation_url = %activation_url, "activation mail send stub");
        Ok(())
    }
}
