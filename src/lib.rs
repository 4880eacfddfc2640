//! # Marketplace API (accounts & sessions)
//!
//! `marketplace-api` is the backend half of the marketplace application. It owns
//! user accounts and the session lifecycle consumed by the single-page frontend:
//! registration, login, logout, password reset and the session check the
//! frontend polls to render its navigation.
//!
//! ## Sessions
//!
//! Sessions are stateless. Login issues a signed JWT that is returned in the
//! body and set as the `accessToken` cookie; every request presents it back via
//! the cookie or an `Authorization: Bearer` header. Nothing is persisted
//! server-side, so logout only clears the cookie: a token copied elsewhere stays
//! valid until it expires.
//!
//! ## Token purposes
//!
//! Session and password-reset tokens share one signing secret but carry an
//! explicit `purpose` claim. Every verification path states the purpose it
//! expects, so a reset link can never be used as a session and vice versa.
//!
//! ## Credential store
//!
//! Users live in `PostgreSQL` (see `sql/schema.sql`). Email uniqueness is the
//! store's own atomic guarantee: registration inserts directly and maps the
//! unique violation to a conflict instead of checking first. Without a DSN the
//! service falls back to an in-memory store for local development.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
