#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header::CONTENT_TYPE},
};
use marketplace_api::{
    api::{
        self, AuthState,
        email::{MailDispatcher, MailMessage},
    },
    auth::AuthConfig,
    store::{CredentialStore, MemoryCredentialStore, NewUser, StoreError, UserRecord},
};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl CapturingMailer {
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailDispatcher for CapturingMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Fails every delivery, like an unreachable relay.
pub struct FailingMailer;

#[async_trait]
impl MailDispatcher for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<()> {
        Err(anyhow!("relay unreachable"))
    }
}

/// Store whose backend is gone: every call fails.
pub struct DownStore;

impl DownStore {
    fn error() -> StoreError {
        StoreError::Backend(anyhow!("connection refused by db.internal:5432"))
    }
}

#[async_trait]
impl CredentialStore for DownStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Err(Self::error())
    }

    async fn create(&self, _user: NewUser) -> Result<UserRecord, StoreError> {
        Err(Self::error())
    }

    async fn save(&self, _user: &UserRecord) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AuthState>,
    pub store: Arc<MemoryCredentialStore>,
    pub mailer: Arc<CapturingMailer>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
    }
}

pub fn config() -> AuthConfig {
    AuthConfig::new(SecretString::from(SECRET)).with_bcrypt_cost(4)
}

pub fn test_app() -> Result<TestApp> {
    let store = Arc::new(MemoryCredentialStore::new());
    let mailer = Arc::new(CapturingMailer::default());
    let state = Arc::new(AuthState::new(config(), store.clone(), mailer.clone()));
    let router = api::app(state.clone())?;
    Ok(TestApp {
        router,
        state,
        store,
        mailer,
    })
}

pub fn test_app_with_mailer(
    mailer: Arc<dyn MailDispatcher>,
) -> Result<(Router, Arc<MemoryCredentialStore>)> {
    let store = Arc::new(MemoryCredentialStore::new());
    let state = Arc::new(AuthState::new(config(), store.clone(), mailer));
    Ok((api::app(state)?, store))
}

/// Router plus its state, backed by `store` and a capturing mailer.
pub fn test_app_with_store(store: Arc<dyn CredentialStore>) -> Result<(Router, Arc<AuthState>)> {
    let state = Arc::new(AuthState::new(
        config(),
        store,
        Arc::new(CapturingMailer::default()),
    ));
    Ok((api::app(state.clone())?, state))
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        send(&self.router, request).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<TestResponse> {
        self.send(json_request(path, body)?).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<TestResponse> {
        self.post_json(
            "/users/register",
            &serde_json::json!({
                "fullname": "A",
                "email": email,
                "password": password,
                "phonenumber": "1",
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TestResponse> {
        self.post_json(
            "/users/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn session_with_bearer(&self, token: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("GET")
            .uri("/users/me")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())?;
        self.send(request).await
    }

    pub async fn session_with_cookie(&self, cookie: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("GET")
            .uri("/users/me")
            .header("cookie", cookie)
            .body(Body::empty())?;
        self.send(request).await
    }
}

pub fn json_request(path: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

pub async fn send(router: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(TestResponse {
        status,
        headers,
        body,
    })
}

/// `name=value` pair of a `Set-Cookie` header, ready to send back as `Cookie`.
pub fn cookie_pair(set_cookie: &str) -> Option<&str> {
    set_cookie.split(';').next().map(str::trim)
}
