//! Outbound mail.
//!
//! Handlers hand a rendered `MailMessage` to a `MailDispatcher` and wait for the
//! result; delivery failures surface to the caller. `SmtpMailer` delivers via
//! an SMTP relay, `LogMailer` only logs and is used when no relay is configured.

mod smtp;

pub use smtp::{SmtpConfig, SmtpMailer};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mail delivery abstraction used by the password reset flow.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Deliver a message or return an error describing why it was not sent.
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Local dev dispatcher that logs the message instead of sending it.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl MailDispatcher for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.html,
            "mail send stub"
        );
        Ok(())
    }
}

pub(crate) const RESET_SUBJECT: &str = "Reset Your Password";

/// Frontend route that consumes reset tokens.
pub(crate) fn build_reset_url(frontend_base_url: &str, token: &str) -> String {
    let base = frontend_base_url.trim_end_matches('/');
    format!("{base}/resetPassword/{token}")
}

/// Render the password reset email for `to`.
pub(crate) fn reset_password_message(
    to: &str,
    reset_url: &str,
    ttl_seconds: i64,
) -> MailMessage {
    let minutes = (ttl_seconds / 60).max(1);
    let html = format!(
        r#"
        <p>Click the link below to reset your password:</p>
        <a href="{reset_url}" style="background: blue; color: white; padding: 10px; text-decoration: none; border-radius: 5px;">
          Reset Password
        </a>
        <p>This link will expire in {minutes} minutes.</p>
      "#
    );

    MailMessage {
        to: to.to_string(),
        subject: RESET_SUBJECT.to_string(),
        html,
    }
}
