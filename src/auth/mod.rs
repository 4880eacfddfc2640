//! Credential primitives: password hashing, signed tokens and the configuration
//! they are built from.
//!
//! `AuthConfig` is assembled once by the CLI layer and handed to the
//! constructors below; nothing in here reads the process environment.

pub mod password;
pub mod token;

use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, str::FromStr};
use url::Url;

pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenPurpose, TokenService};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_RESET_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:5173";
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// `SameSite` attribute of the session cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            other => Err(format!("invalid SameSite value: {other}")),
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    token_secret: SecretString,
    session_ttl_seconds: i64,
    reset_ttl_seconds: i64,
    bcrypt_cost: u32,
    frontend_base_url: String,
    cookie_secure: bool,
    cookie_same_site: SameSite,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            reset_ttl_seconds: DEFAULT_RESET_TTL_SECONDS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            frontend_base_url: DEFAULT_FRONTEND_BASE_URL.to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::None,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_reset_ttl_seconds(mut self, seconds: i64) -> Self {
        self.reset_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn with_frontend_base_url(mut self, url: String) -> Self {
        self.frontend_base_url = url;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie_same_site = same_site;
        self
    }

    /// Reject combinations the services cannot honour.
    ///
    /// # Errors
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.token_secret.expose_secret().trim().is_empty() {
            return Err(anyhow!("Token secret must not be empty"));
        }
        if self.session_ttl_seconds <= 0 {
            return Err(anyhow!("Session TTL must be positive"));
        }
        if self.reset_ttl_seconds <= 0 {
            return Err(anyhow!("Reset TTL must be positive"));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(anyhow!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            ));
        }
        Url::parse(&self.frontend_base_url)
            .with_context(|| format!("Invalid frontend base URL: {}", self.frontend_base_url))?;
        // Browsers drop SameSite=None cookies that are not Secure.
        if self.cookie_same_site == SameSite::None && !self.cookie_secure {
            return Err(anyhow!("SameSite=None requires a Secure cookie"));
        }
        Ok(())
    }

    pub(crate) fn token_secret(&self) -> &SecretString {
        &self.token_secret
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn reset_ttl_seconds(&self) -> i64 {
        self.reset_ttl_seconds
    }

    #[must_use]
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn cookie_same_site(&self) -> SameSite {
        self.cookie_same_site
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"***")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("reset_ttl_seconds", &self.reset_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("frontend_base_url", &self.frontend_base_url)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

/// Current unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}
