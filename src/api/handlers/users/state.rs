use std::sync::Arc;

use crate::{
    api::email::MailDispatcher,
    auth::{AuthConfig, PasswordHasher, TokenService},
    store::CredentialStore,
};

/// Everything the `/users` handlers need, built once at startup and shared
/// through an `Extension<Arc<AuthState>>`.
pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
    hasher: PasswordHasher,
    store: Arc<dyn CredentialStore>,
    mailer: Arc<dyn MailDispatcher>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn CredentialStore>,
        mailer: Arc<dyn MailDispatcher>,
    ) -> Self {
        let tokens = TokenService::new(&config);
        let hasher = PasswordHasher::new(config.bcrypt_cost());
        Self {
            config,
            tokens,
            hasher,
            store,
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[must_use]
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn mailer(&self) -> &dyn MailDispatcher {
        self.mailer.as_ref()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
