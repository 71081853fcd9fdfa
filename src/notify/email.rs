use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::DigestEmail;

/// SMTP delivery over STARTTLS (the Gmail-style 587 path). One message,
/// all recipients on it.
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSender {
    pub fn new(host: &str, user: String, pass: String, from: &str, recipients: &[String]) -> Result<Self> {
        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("invalid smtp host '{host}'"))?
            .credentials(creds)
            .timeout(Some(Duration::from_secs(30)))
            .build();

        let from: Mailbox = from
            .parse()
            .with_context(|| format!("invalid sender address '{from}'"))?;
        let mut to = Vec::with_capacity(recipients.len());
        for r in recipients {
            to.push(
                r.parse::<Mailbox>()
                    .with_context(|| format!("invalid recipient address '{r}'"))?,
            );
        }

        Ok(Self { mailer, from, to })
    }

    pub async fn send_digest(&self, email: &DigestEmail) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.clone());
        for to in &self.to {
            builder = builder.to(to.clone());
        }

        let msg = builder
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .context("build email")?;

        match self.mailer.send(msg).await {
            Ok(_) => {
                tracing::info!(recipients = self.to.len(), subject = %email.subject, "digest sent");
                Ok(())
            }
            Err(e) if e.is_permanent() => Err(anyhow::Error::new(e).context(
                "smtp rejected the message; for Gmail, SMTP_PASS must be a 16-char app password (Google Account > Security > App Passwords), not the account password",
            )),
            Err(e) => Err(anyhow::Error::new(e).context("send email")),
        }
    }
}
