//! Request and response payloads for the `/users` endpoints.
//!
//! Request fields are optional at the serde level so a missing field becomes a
//! validation message instead of a JSON rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::User;

#[derive(ToSchema, Deserialize, Default)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phonenumber: Option<String>,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

// Passwords must never reach the logs.
impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("phonenumber", &self.phonenumber)
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
    pub access_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SessionResponse {
    pub(super) fn anonymous() -> Self {
        Self {
            is_logged_in: false,
            user: None,
            message: None,
        }
    }

    pub(super) fn authenticated(user: User) -> Self {
        Self {
            is_logged_in: true,
            user: Some(user),
            message: None,
        }
    }
}

/// Return the trimmed value when present and non-empty.
pub(super) fn required(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Normalize an email for lookup and uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn required_rejects_blank_values() {
        let blank = "   ".to_string();
        let value = " a ".to_string();
        assert_eq!(required(None), None);
        assert_eq!(required(Some(&blank)), None);
        assert_eq!(required(Some(&value)), Some("a"));
    }

    #[test]
    fn request_debug_redacts_password() {
        let request = LoginRequest {
            email: Some("a@x.com".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn anonymous_session_serializes_flag_only() -> anyhow::Result<()> {
        let value = serde_json::to_value(SessionResponse::anonymous())?;
        assert_eq!(value, serde_json::json!({ "isLoggedIn": false }));
        Ok(())
    }
}
