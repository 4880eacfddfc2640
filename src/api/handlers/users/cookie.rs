//! The `accessToken` cookie.
//!
//! Login and logout both go through this module so the cookie attributes can
//! only differ in value and `Max-Age`.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, COOKIE, InvalidHeaderValue},
};

use crate::auth::AuthConfig;

pub const SESSION_COOKIE_NAME: &str = "accessToken";

fn render(
    config: &AuthConfig,
    value: &str,
    max_age: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite={}; Max-Age={max_age}",
        config.cookie_same_site()
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value carrying a session token for the session lifetime.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    render(config, token, config.session_ttl_seconds())
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    render(config, "", 0)
}

/// Find the presented token: the `accessToken` cookie wins over a bearer header.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie_token(headers).or_else(|| extract_bearer_token(headers))
}

fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SameSite;
    use anyhow::Result;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("secret"))
    }

    #[test]
    fn session_cookie_has_default_attributes() -> Result<()> {
        let cookie = session_cookie(&config(), "abc")?;
        assert_eq!(
            cookie.to_str()?,
            "accessToken=abc; Path=/; HttpOnly; SameSite=None; Max-Age=86400; Secure"
        );
        Ok(())
    }

    #[test]
    fn clear_cookie_matches_session_attributes() -> Result<()> {
        let config = config()
            .with_cookie_secure(false)
            .with_cookie_same_site(SameSite::Lax);
        let set = session_cookie(&config, "abc")?;
        let cleared = clear_session_cookie(&config)?;
        assert_eq!(
            cleared.to_str()?,
            "accessToken=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
        assert_eq!(
            set.to_str()?.replace("abc", "").replace("86400", "0"),
            cleared.to_str()?
        );
        Ok(())
    }

    #[test]
    fn extract_prefers_cookie_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; accessToken=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn extract_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("accessToken="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer from-header"));
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn extract_ignores_other_schemes_and_missing_values() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_token(&headers), None);
    }
}
