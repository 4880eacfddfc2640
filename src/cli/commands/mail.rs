use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_SMTP_HOST: &str = "smtp-host";
pub const ARG_SMTP_PORT: &str = "smtp-port";
pub const ARG_SMTP_USERNAME: &str = "smtp-username";
pub const ARG_SMTP_PASSWORD: &str = "smtp-password";
pub const ARG_MAIL_FROM: &str = "mail-from";

#[derive(Debug)]
pub struct Options {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub mail_from: Option<String>,
}

impl Options {
    /// Parse outbound mail arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a relay is configured without any sender address.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // Helper to filter empty strings which clap might pass through if env vars are set to ""
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let smtp_host = get_non_empty(ARG_SMTP_HOST);
        let smtp_username = get_non_empty(ARG_SMTP_USERNAME);
        let mail_from = get_non_empty(ARG_MAIL_FROM).or_else(|| smtp_username.clone());

        if smtp_host.is_some() && mail_from.is_none() {
            anyhow::bail!(
                "missing required argument: --{ARG_MAIL_FROM} (or --{ARG_SMTP_USERNAME}) when --{ARG_SMTP_HOST} is set"
            );
        }

        Ok(Self {
            smtp_host,
            smtp_port: matches
                .get_one::<u16>(ARG_SMTP_PORT)
                .copied()
                .unwrap_or(587),
            smtp_username,
            smtp_password: get_non_empty(ARG_SMTP_PASSWORD).map(SecretString::from),
            mail_from,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SMTP_HOST)
                .long(ARG_SMTP_HOST)
                .help("SMTP relay host; reset emails are only logged when unset")
                .env("MARKETPLACE_SMTP_HOST"),
        )
        .arg(
            Arg::new(ARG_SMTP_PORT)
                .long(ARG_SMTP_PORT)
                .help("SMTP relay port (STARTTLS)")
                .env("MARKETPLACE_SMTP_PORT")
                .default_value("587")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SMTP_USERNAME)
                .long(ARG_SMTP_USERNAME)
                .help("SMTP username")
                .env("MARKETPLACE_SMTP_USERNAME"),
        )
        .arg(
            Arg::new(ARG_SMTP_PASSWORD)
                .long(ARG_SMTP_PASSWORD)
                .help("SMTP password")
                .env("MARKETPLACE_SMTP_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_MAIL_FROM)
                .long(ARG_MAIL_FROM)
                .help("Sender mailbox, defaults to the SMTP username")
                .env("MARKETPLACE_MAIL_FROM"),
        )
}
