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
    cookie::{clear_session_cookie, extract_token},
    error::ApiError,
    state::AuthState,
    types::MessageResponse,
};
use crate::auth::TokenPurpose;

/// Clear the session cookie.
///
/// Tokens are not revoked: a copy of a still-valid token keeps working when
/// presented directly until it expires.
#[utoipa::path(
    post,
    path = "/users/logout",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse),
        (status = 400, description = "No token presented", body = MessageResponse),
        (status = 401, description = "Token invalid, expired or not a session token", body = MessageResponse),
        (status = 404, description = "Token subject no longer exists", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
#[instrument(skip(auth_state, headers))]
pub async fn logout(
    auth_state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let Some(token) = extract_token(&headers) else {
        return Err(ApiError::Validation("No access token provided"));
    };

    let user_id = match auth_state.tokens().verify_for(&token, TokenPurpose::Session) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!("logout rejected: {err}");
            return Err(ApiError::Unauthorized("Invalid access token"));
        }
    };

    if auth_state
        .store()
        .find_by_id(user_id)
        .await
        .map_err(ApiError::internal)?
        .is_none() {
        return Err(ApiError::NotFound("User not found."));
    }

    let cookie = clear_session_cookie(auth_state.config())
        .map_err(|err| ApiError::Internal(anyhow!("failed to build session cookie: {err}")))?;
    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);

    info!(%user_id, "user logged out");

    Ok((
        StatusCode::OK,
        response_headers,
        Json(MessageResponse::new("Logout successful")),
    ))
}
