use clap::{Arg, ArgMatches, Command, builder::BoolishValueParser};
use secrecy::SecretString;

use crate::auth::SameSite;

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_RESET_TTL_SECONDS: &str = "reset-ttl-seconds";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_COOKIE_SAME_SITE: &str = "cookie-same-site";

#[derive(Debug)]
pub struct Options {
    pub token_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub reset_ttl_seconds: i64,
    pub bcrypt_cost: u32,
    pub frontend_base_url: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Options {
    /// Parse session and token arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the token secret is missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let token_secret = matches
            .get_one::<String>(ARG_TOKEN_SECRET)
            .filter(|v| !v.trim().is_empty())
            .map(|v| SecretString::from(v.as_str()))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_TOKEN_SECRET}"))?;

        Ok(Self {
            token_secret,
            session_ttl_seconds: matches
                .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
                .copied()
                .unwrap_or(86_400),
            reset_ttl_seconds: matches
                .get_one::<i64>(ARG_RESET_TTL_SECONDS)
                .copied()
                .unwrap_or(900),
            bcrypt_cost: matches
                .get_one::<u32>(ARG_BCRYPT_COST)
                .copied()
                .unwrap_or(10),
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            cookie_secure: matches
                .get_one::<bool>(ARG_COOKIE_SECURE)
                .copied()
                .unwrap_or(true),
            cookie_same_site: matches
                .get_one::<SameSite>(ARG_COOKIE_SAME_SITE)
                .copied()
                .unwrap_or(SameSite::None),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("Secret used to sign session and password reset tokens")
                .env("MARKETPLACE_TOKEN_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session token and cookie lifetime in seconds")
                .env("MARKETPLACE_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_RESET_TTL_SECONDS)
                .long(ARG_RESET_TTL_SECONDS)
                .help("Password reset token lifetime in seconds")
                .env("MARKETPLACE_RESET_TTL_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt cost factor (4-31)")
                .env("MARKETPLACE_BCRYPT_COST")
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL used for reset links and CORS")
                .env("MARKETPLACE_FRONTEND_BASE_URL")
                .default_value("http://localhost:5173"),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure")
                .env("MARKETPLACE_COOKIE_SECURE")
                .default_value("true")
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_COOKIE_SAME_SITE)
                .long(ARG_COOKIE_SAME_SITE)
                .help("SameSite attribute of the session cookie: none, lax or strict")
                .env("MARKETPLACE_COOKIE_SAME_SITE")
                .default_value("none")
                .value_parser(|value: &str| value.parse::<SameSite>()),
        )
}
