//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action, here always starting the API
//! server with its full configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DSN, ARG_PORT, auth, mail};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .filter(|dsn| !dsn.trim().is_empty());

    let auth_opts = auth::Options::parse(matches)?;
    let mail_opts = mail::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret: auth_opts.token_secret,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        reset_ttl_seconds: auth_opts.reset_ttl_seconds,
        bcrypt_cost: auth_opts.bcrypt_cost,
        frontend_base_url: auth_opts.frontend_base_url,
        cookie_secure: auth_opts.cookie_secure,
        cookie_same_site: auth_opts.cookie_same_site,
        smtp_host: mail_opts.smtp_host,
        smtp_port: mail_opts.smtp_port,
        smtp_username: mail_opts.smtp_username,
        smtp_password: mail_opts.smtp_password,
        mail_from: mail_opts.mail_from,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn server_action_from_args() -> Result<()> {
        temp_env::with_vars(
            [
                ("MARKETPLACE_DSN", None::<&str>),
                ("MARKETPLACE_SMTP_HOST", None),
                ("MARKETPLACE_BCRYPT_COST", None),
            ],
            || -> Result<()> {
                let matches = commands::new().try_get_matches_from([
                    "marketplace",
                    "--port",
                    "9090",
                    "--token-secret",
                    "s3cret",
                    "--bcrypt-cost",
                    "12",
                ])?;
                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 9090);
                assert!(args.dsn.is_none());
                assert_eq!(args.bcrypt_cost, 12);
                assert!(args.smtp_host.is_none());
                assert!(!format!("{args:?}").contains("s3cret"));
                Ok(())
            },
        )
    }

    #[test]
    fn empty_dsn_means_memory_store() -> Result<()> {
        temp_env::with_vars([("MARKETPLACE_DSN", Some(""))], || -> Result<()> {
            let matches = commands::new().try_get_matches_from([
                "marketplace",
                "--token-secret",
                "s3cret",
            ])?;
            let Action::Server(args) = handler(&matches)?;
            assert!(args.dsn.is_none());
            Ok(())
        })
    }
}
