use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use super::handlers::{
    health,
    users::{self, cookie::SESSION_COOKIE_NAME, types},
};
use crate::store::User;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::register::register,
        users::login::login,
        users::logout::logout,
        users::password::forgot_password,
        users::password::reset_password,
        users::session::session,
    ),
    components(schemas(
        health::Health,
        User,
        types::RegisterRequest,
        types::LoginRequest,
        types::ForgotPasswordRequest,
        types::ResetPasswordRequest,
        types::MessageResponse,
        types::UserResponse,
        types::LoginResponse,
        types::SessionResponse,
    )),
    modifiers(&SessionSecurity),
    tags(
        (name = "users", description = "Registration, login, logout, password reset and session check"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Session tokens are accepted from the `accessToken` cookie or a bearer header.
struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
