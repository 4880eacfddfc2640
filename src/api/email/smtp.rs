use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{MailDispatcher, MailMessage};
use crate::APP_USER_AGENT;

#[derive(Clone)]
pub struct SmtpConfig {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    from: String,
}

impl SmtpConfig {
    #[must_use]
    pub fn new(host: String, from: String) -> Self {
        Self {
            host,
            port: 587,
            username: None,
            password: None,
            from,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: String, password: SecretString) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from", &self.from)
            .finish()
    }
}

/// Delivers mail through an SMTP relay using STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the relay transport. No connection is opened until the first send.
    ///
    /// # Errors
    /// Returns an error if the relay host or sender address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from: Mailbox = config
            .from()
            .parse()
            .with_context(|| format!("Invalid sender address: {}", config.from()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host())
            .with_context(|| format!("Invalid SMTP relay: {}", config.host()))?
            .port(config.port());

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }

        debug!(
            host = config.host(),
            port = config.port(),
            from = config.from(),
            "SMTP relay configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailDispatcher for SmtpMailer {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let to: Mailbox = message
            .to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", message.to))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .user_agent(APP_USER_AGENT.to_string())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .context("Failed to build email")?;

        self.transport
            .send(email)
            .await
            .context("SMTP delivery failed")?;

        debug!("email delivered");

        Ok(())
    }
}
