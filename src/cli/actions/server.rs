use crate::{
    api::{
        self, AuthState,
        email::{LogMailer, MailDispatcher, SmtpConfig, SmtpMailer},
    },
    auth::{AuthConfig, SameSite},
    store::{CredentialStore, MemoryCredentialStore, PgCredentialStore},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub token_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub reset_ttl_seconds: i64,
    pub bcrypt_cost: u32,
    pub frontend_base_url: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub mail_from: Option<String>,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.token_secret.clone())
            .with_session_ttl_seconds(self.session_ttl_seconds)
            .with_reset_ttl_seconds(self.reset_ttl_seconds)
            .with_bcrypt_cost(self.bcrypt_cost)
            .with_frontend_base_url(self.frontend_base_url.clone())
            .with_cookie_secure(self.cookie_secure)
            .with_cookie_same_site(self.cookie_same_site)
    }

    fn mailer(&self) -> Result<Arc<dyn MailDispatcher>> {
        let Some(host) = &self.smtp_host else {
            warn!("No SMTP relay configured, password reset emails are only logged");
            return Ok(Arc::new(LogMailer));
        };
        let from = self
            .mail_from
            .clone()
            .or_else(|| self.smtp_username.clone())
            .context("A sender address is required when an SMTP relay is configured")?;

        let mut config = SmtpConfig::new(host.clone(), from).with_port(self.smtp_port);
        if let (Some(username), Some(password)) = (&self.smtp_username, &self.smtp_password) {
            config = config.with_credentials(username.clone(), password.clone());
        }
        debug!("SMTP config: {:?}", config);

        Ok(Arc::new(SmtpMailer::new(&config)?))
    }

    async fn store(&self) -> Result<Arc<dyn CredentialStore>> {
        match &self.dsn {
            Some(dsn) => Ok(Arc::new(PgCredentialStore::connect(dsn).await?)),
            None => {
                warn!("No DSN configured, users are kept in memory and lost on restart");
                Ok(Arc::new(MemoryCredentialStore::new()))
            }
        }
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid, the database is
/// unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.auth_config();
    config.validate().context("Invalid auth configuration")?;
    debug!("Auth config: {:?}", config);

    let mailer = args.mailer()?;
    let store = args.store().await?;

    let auth_state = Arc::new(AuthState::new(config, store, mailer));

    info!("Starting {} on port {}", env!("CARGO_PKG_NAME"), args.port);

    api::new(args.port, auth_state).await
}
