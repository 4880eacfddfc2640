use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, NewUser, StoreError, UserRecord};
use crate::auth::unix_now;

/// Process-local store for development and tests. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Count users registered under `email`.
    pub async fn count_by_email(&self, email: &str) -> usize {
        self.users
            .read()
            .await
            .values()
            .filter(|user| user.email == email)
            .count()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        // The uniqueness check runs under the same write lock as the insert.
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict);
        }

        let now = unix_now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            fullname: user.fullname,
            email: user.email,
            phonenumber: user.phonenumber,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn save(&self, user: &UserRecord) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(&user.id) else {
            return Ok(false);
        };
        stored.fullname.clone_from(&user.fullname);
        stored.phonenumber.clone_from(&user.phonenumber);
        stored.password_hash.clone_from(&user.password_hash);
        stored.updated_at = unix_now();
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
