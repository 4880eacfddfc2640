//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool to
//! keep the request executor responsive.

use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// One-way transform of a plaintext password into a storable hash.
    ///
    /// # Errors
    /// Returns an error if bcrypt rejects the input or the blocking task panics.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_string();
        let cost = self.cost;
        let hashed = task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Compare a plaintext attempt against a stored hash.
    ///
    /// A malformed stored hash is reported as a mismatch, not an error, so a
    /// corrupt record can never authenticate.
    ///
    /// # Errors
    /// Returns an error only if the blocking task panics.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_string();
        let hash = hash.to_string();
        let matches = task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await?;
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    // Minimum cost keeps the suite fast; production defaults to 10.
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_is_not_plaintext_and_verifies() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("p1").await?;
        assert_ne!(hash, "p1");
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("p1", &hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("p1").await?;
        assert!(!hasher.verify("wrong", &hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn hashes_are_salted() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("same").await?;
        let second = hasher.hash("same").await?;
        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn verify_treats_malformed_hash_as_mismatch() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(!hasher.verify("p1", "not-a-bcrypt-hash").await?);
        Ok(())
    }
}
