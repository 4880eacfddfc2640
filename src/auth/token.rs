//! Signed, time-bounded tokens (HS256 JWT).
//!
//! Session and password-reset tokens are signed with the same secret, so the
//! `purpose` claim is what keeps them apart. Callers always verify against the
//! purpose they expect; a token minted for one flow is rejected by the other.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{AuthConfig, unix_now};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

impl TokenPurpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// JWT payload shared by every token kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("{} token used where {} is expected", .actual.as_str(), .expected.as_str())]
    WrongPurpose {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_ttl_seconds: i64,
    reset_ttl_seconds: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret().expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            session_ttl_seconds: config.session_ttl_seconds(),
            reset_ttl_seconds: config.reset_ttl_seconds(),
        }
    }

    /// Lifetime applied to tokens of the given purpose.
    #[must_use]
    pub fn ttl_seconds(&self, purpose: TokenPurpose) -> i64 {
        match purpose {
            TokenPurpose::Session => self.session_ttl_seconds,
            TokenPurpose::PasswordReset => self.reset_ttl_seconds,
        }
    }

    /// Issue a token for `subject` using the configured lifetime for `purpose`.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if the claims cannot be encoded.
    pub fn sign(&self, subject: Uuid, purpose: TokenPurpose) -> Result<String, TokenError> {
        self.sign_with_ttl(subject, purpose, self.ttl_seconds(purpose))
    }

    /// Issue a token with an explicit lifetime.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if the claims cannot be encoded.
    pub fn sign_with_ttl(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        self.sign_at(subject, purpose, unix_now(), ttl_seconds)
    }

    pub(crate) fn sign_at(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        issued_at: i64,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            purpose,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature and expiry and return the decoded claims.
    ///
    /// # Errors
    /// `TokenError::Expired` once `exp` has passed, `TokenError::Invalid` for
    /// anything malformed or tampered with.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }

    /// Verify a token and require it to carry `expected` as its purpose.
    ///
    /// # Errors
    /// Everything `verify` returns, plus `TokenError::WrongPurpose` and
    /// `TokenError::Invalid` when the subject is not a user id.
    pub fn verify_for(&self, token: &str, expected: TokenPurpose) -> Result<Uuid, TokenError> {
        let claims = self.verify(token)?;
        if claims.purpose != expected {
            return Err(TokenError::WrongPurpose {
                expected,
                actual: claims.purpose,
            });
        }
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use secrecy::SecretString;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig::new(SecretString::from(secret)))
    }

    #[test]
    fn session_token_round_trips_subject() -> Result<()> {
        let tokens = service("secret");
        let user_id = Uuid::new_v4();
        let token = tokens.sign(user_id, TokenPurpose::Session)?;

        let claims = tokens.verify(&token)?;
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.purpose, TokenPurpose::Session);
        assert_eq!(claims.exp - claims.iat, 86_400);

        assert_eq!(tokens.verify_for(&token, TokenPurpose::Session)?, user_id);
        Ok(())
    }

    #[test]
    fn reset_token_uses_short_lifetime() -> Result<()> {
        let tokens = service("secret");
        let token = tokens.sign(Uuid::new_v4(), TokenPurpose::PasswordReset)?;
        let claims = tokens.verify(&token)?;
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        Ok(())
    }

    #[test]
    fn purposes_are_not_interchangeable() -> Result<()> {
        let tokens = service("secret");
        let user_id = Uuid::new_v4();
        let reset = tokens.sign(user_id, TokenPurpose::PasswordReset)?;
        let session = tokens.sign(user_id, TokenPurpose::Session)?;

        assert!(matches!(
            tokens.verify_for(&reset, TokenPurpose::Session),
            Err(TokenError::WrongPurpose {
                expected: TokenPurpose::Session,
                actual: TokenPurpose::PasswordReset,
            })
        ));
        let err = tokens.verify_for(&session, TokenPurpose::PasswordReset);
        assert!(matches!(err, Err(TokenError::WrongPurpose { .. })));
        assert_eq!(
            err.err().map(|err| err.to_string()),
            Some("session token used where password_reset is expected".to_string())
        );
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> Result<()> {
        let tokens = service("secret");
        let issued_at = unix_now() - 3_600;
        let token = tokens.sign_at(Uuid::new_v4(), TokenPurpose::PasswordReset, issued_at, 900)?;
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
        Ok(())
    }

    #[test]
    fn foreign_secret_is_rejected() -> Result<()> {
        let token = service("one").sign(Uuid::new_v4(), TokenPurpose::Session)?;
        assert!(matches!(
            service("two").verify(&token),
            Err(TokenError::Invalid)
        ));
        Ok(())
    }

    #[test]
    fn tampered_payload_is_rejected() -> Result<()> {
        let tokens = service("secret");
        let token = tokens.sign(Uuid::new_v4(), TokenPurpose::Session)?;
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        // Graft another token's payload onto this signature.
        let forged = tokens.sign(Uuid::new_v4(), TokenPurpose::Session)?;
        let forged_payload = forged.split('.').nth(1).unwrap_or_default().to_string();
        parts[1] = forged_payload;
        let tampered = parts.join(".");
        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid)));
        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = service("secret");
        assert!(matches!(tokens.verify("invalid.token.here"), Err(TokenError::Invalid)));
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn non_uuid_subject_is_invalid() -> Result<()> {
        let tokens = service("secret");
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            purpose: TokenPurpose::Session,
            iat: unix_now(),
            exp: unix_now() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )?;
        assert!(matches!(
            tokens.verify_for(&token, TokenPurpose::Session),
            Err(TokenError::Invalid)
        ));
        Ok(())
    }

    #[test]
    fn purpose_serializes_snake_case() -> Result<()> {
        let value = serde_json::to_value(TokenPurpose::PasswordReset)?;
        assert_eq!(value, serde_json::json!("password_reset"));
        assert_eq!(TokenPurpose::PasswordReset.as_str(), "password_reset");
        Ok(())
    }
}
