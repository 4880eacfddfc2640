//! Account and session lifecycle endpoints under `/users`.
//!
//! Flow overview:
//! - Register: validate, hash, insert; the store's unique index decides conflicts.
//! - Login: look up by email, verify the hash, sign a session token, return it in
//!   the body and as the `accessToken` cookie.
//! - Logout: verify the presented session token and clear the cookie.
//! - Forgot/reset password: email a 15-minute reset token, then replace the hash
//!   when a valid reset token comes back.
//! - Session check: resolve the presented token to a user without ever failing
//!   on auth problems.

pub mod cookie;
pub mod error;
pub mod login;
pub mod logout;
pub mod password;
pub mod register;
pub mod session;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use login::login;
pub use logout::logout;
pub use password::{forgot_password, reset_password, reset_password_without_token};
pub use register::register;
pub use session::session;
pub use state::AuthState;
