//! Forgot-password and reset-password.
//!
//! Reset tokens are signed with the session secret but carry
//! `purpose = password_reset`; the reset handler refuses anything else. They
//! are not single-use: a link can be replayed until it expires.

use anyhow::Context;
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    error::ApiError,
    state::AuthState,
    types::{
        ForgotPasswordRequest, MessageResponse, ResetPasswordRequest, normalize_email, required,
    },
};
use crate::{
    api::email::{build_reset_url, reset_password_message},
    auth::TokenPurpose,
};

#[utoipa::path(
    post,
    path = "/users/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 400, description = "Email missing", body = MessageResponse),
        (status = 404, description = "No user with this email", body = MessageResponse),
        (status = 500, description = "Token or mail delivery failure", body = MessageResponse)
    ),
    tag = "users"
)]
#[instrument(skip(auth_state, payload))]
pub async fn forgot_password(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let Some(email) = required(request.email.as_ref()) else {
        return Err(ApiError::Validation("Email is required"));
    };
    let email = normalize_email(email);

    let Some(record) = auth_state
        .store()
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal)?
    else {
        debug!("reset requested for unknown email");
        return Err(ApiError::NotFound("User not found."));
    };

    let token = auth_state
        .tokens()
        .sign(record.id, TokenPurpose::PasswordReset)
        .map_err(|err| ApiError::Internal(err.into()))?;

    let config = auth_state.config();
    let reset_url = build_reset_url(config.frontend_base_url(), &token);
    let message = reset_password_message(&record.email, &reset_url, config.reset_ttl_seconds());

    auth_state
        .mailer()
        .send(&message)
        .await
        .context("failed to send password reset email")
        .map_err(ApiError::Internal)?;

    info!(user_id = %record.id, "password reset link sent");

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password reset link sent to your email")),
    ))
}

#[utoipa::path(
    post,
    path = "/users/reset-password/{token}",
    params(
        ("token" = String, Path, description = "Reset token from the emailed link")
    ),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Token or password missing, or token invalid, expired or not a reset token", body = MessageResponse),
        (status = 404, description = "Token subject no longer exists", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "users"
)]
#[instrument(skip(auth_state, token, payload))]
pub async fn reset_password(
    auth_state: Extension<Arc<AuthState>>,
    Path(token): Path<String>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    if token.trim().is_empty() {
        return Err(ApiError::Validation("Token is required"));
    }

    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(ApiError::Validation("Password is required"));
    };

    let user_id = match auth_state
        .tokens()
        .verify_for(token.trim(), TokenPurpose::PasswordReset)
    {
        Ok(user_id) => user_id,
        Err(err) => {
            warn!("reset token rejected: {err}");
            return Err(ApiError::InvalidToken("Invalid or expired token"));
        }
    };

    let Some(mut record) = auth_state
        .store()
        .find_by_id(user_id)
        .await
        .map_err(ApiError::internal)?
    else {
        return Err(ApiError::NotFound("User not found."));
    };

    record.password_hash = auth_state
        .hasher()
        .hash(password)
        .await
        .map_err(ApiError::internal)?;

    if !auth_state
        .store()
        .save(&record)
        .await
        .map_err(ApiError::internal)?
    {
        return Err(ApiError::NotFound("User not found."));
    }

    info!(%user_id, "password reset");

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password has been reset successfully")),
    ))
}

/// `POST /users/reset-password` without the token segment.
pub async fn reset_password_without_token() -> ApiError {
    ApiError::Validation("Token is required")
}
