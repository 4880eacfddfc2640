use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{cookie::extract_token, state::AuthState, types::SessionResponse};
use crate::{auth::TokenPurpose, store::User};

/// Session check polled by the frontend.
///
/// Auth failures are not errors here: a missing, invalid, expired or
/// wrong-purpose token, or a deleted user, all answer `isLoggedIn: false`.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Session state; `user` is present when logged in", body = SessionResponse),
        (status = 500, description = "Credential store failure", body = SessionResponse)
    ),
    security((), ("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
#[instrument(skip(auth_state, headers))]
pub async fn session(
    auth_state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = extract_token(&headers) else {
        return (StatusCode::OK, Json(SessionResponse::anonymous()));
    };

    let user_id = match auth_state.tokens().verify_for(&token, TokenPurpose::Session) {
        Ok(user_id) => user_id,
        Err(err) => {
            debug!("session token rejected: {err}");
            return (StatusCode::OK, Json(SessionResponse::anonymous()));
        }
    };

    match auth_state.store().find_by_id(user_id).await {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(SessionResponse::authenticated(User::from(record))),
        ),
        Ok(None) => {
            debug!(%user_id, "session for missing user");
            (StatusCode::OK, Json(SessionResponse::anonymous()))
        }
        Err(err) => {
            error!("Failed to lookup session user: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SessionResponse {
                    message: Some("Internal server error".to_string()),
                    ..SessionResponse::anonymous()
                }),
            )
        }
    }
}
