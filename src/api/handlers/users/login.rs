use anyhow::anyhow;
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    cookie::session_cookie,
    error::ApiError,
    state::AuthState,
    types::{LoginRequest, LoginResponse, normalize_email, required},
};
use crate::{auth::TokenPurpose, store::User};

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; the session token is also set as the accessToken cookie", body = LoginResponse),
        (status = 400, description = "Email or password missing", body = super::types::MessageResponse),
        (status = 401, description = "Wrong password", body = super::types::MessageResponse),
        (status = 404, description = "No user with this email", body = super::types::MessageResponse),
        (status = 500, description = "Server error", body = super::types::MessageResponse)
    ),
    tag = "users"
)]
#[instrument(skip(auth_state, payload))]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let Some(email) = required(request.email.as_ref()) else {
        return Err(ApiError::Validation("Email is required."));
    };
    let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(ApiError::Validation("Password is required."));
    };
    let email = normalize_email(email);

    let Some(record) = auth_state.store().find_by_email(&email).await? else {
        debug!("login for unknown email");
        return Err(ApiError::NotFound("User not found."));
    };

    if !auth_state
        .hasher()
        .verify(password, &record.password_hash)
        .await?
    {
        debug!(user_id = %record.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Invalid credentials."));
    }

    let token = auth_state
        .tokens()
        .sign(record.id, TokenPurpose::Session)
        .map_err(|err| ApiError::Server(err.into()))?;
    let cookie = session_cookie(auth_state.config(), &token)
        .map_err(|err| ApiError::Server(anyhow!("failed to build session cookie: {err}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    info!(user_id = %record.id, "user logged in");

    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            message: "User logged in successfully".to_string(),
            user: User::from(record),
            access_token: token,
        }),
    ))
}
