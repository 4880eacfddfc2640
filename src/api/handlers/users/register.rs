use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    error::ApiError,
    state::AuthState,
    types::{RegisterRequest, UserResponse, normalize_email, required},
};
use crate::store::{NewUser, User};

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing fields, invalid email or email already registered", body = super::types::MessageResponse),
        (status = 500, description = "Server error", body = super::types::MessageResponse)
    ),
    tag = "users"
)]
#[instrument(skip(auth_state, payload))]
pub async fn register(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let (Some(fullname), Some(email), Some(phonenumber)) = (
        required(request.fullname.as_ref()),
        required(request.email.as_ref()),
        required(request.phonenumber.as_ref()),
    ) else {
        return Err(ApiError::Validation("All fields are required"));
    };
    let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(ApiError::Validation("All fields are required"));
    };

    let email = normalize_email(email);
    if !valid_email(&email) {
        debug!("rejected malformed email");
        return Err(ApiError::Validation("Invalid email"));
    }

    let password_hash = auth_state.hasher().hash(password).await?;

    // The store rejects duplicates atomically; no existence check beforehand.
    let record = auth_state
        .store()
        .create(NewUser {
            fullname: fullname.to_string(),
            email,
            phonenumber: phonenumber.to_string(),
            password_hash,
        })
        .await?;

    info!(user_id = %record.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User registered successfully".to_string(),
            user: User::from(record),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::valid_email;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_malformed() {
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a x@x.com"));
        assert!(!valid_email("@x.com"));
    }
}
