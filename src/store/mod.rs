//! Credential store: persistence of user records.
//!
//! Handlers only see the `CredentialStore` trait. `PgCredentialStore` is the
//! production backend; `MemoryCredentialStore` backs local development and the
//! test suite.
//!
//! Reads return a `UserRecord`, which carries the password hash and is never
//! serialized. Anything leaving the service goes through `User`, which has no
//! hash field at all, so excluding the secret is a type-level guarantee.

mod memory;
mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The email is already registered; raised atomically by `create`.
    #[error("a user with this email already exists")]
    Conflict,
    #[error("credential store failure: {0:#}")]
    Backend(anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.into())
    }
}

/// Fields required to create a user. `email` must already be normalized.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub phonenumber: String,
    pub password_hash: String,
}

/// Stored user, including the password hash.
#[derive(Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phonenumber: String,
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("phonenumber", &self.phonenumber)
            .field("password_hash", &"***")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Public view of a user; never contains the password hash.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phonenumber: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            fullname: record.fullname,
            email: record.email,
            phonenumber: record.phonenumber,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new user. Fails with `StoreError::Conflict` when the email is
    /// taken; the check and the insert are a single atomic step.
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Persist the mutable fields of an existing user (name, phone, password
    /// hash). Returns `false` if the user no longer exists.
    async fn save(&self, user: &UserRecord) -> Result<bool, StoreError>;

    /// Cheap liveness probe used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}
