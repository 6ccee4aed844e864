#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use todo_api::auth::{AuthError, Claims, TokenVerifier};
use todo_api::db;
use todo_api::routes::router;
use todo_api::state::AppState;

pub const CLIENT_ORIGIN: &str = "http://localhost:3000";

/// Accepts `token-<user>` as a token for `<user>`, and `token-nosub` as a
/// valid token carrying no subject.
#[derive(Default)]
pub struct FakeVerifier {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let sub = match token.strip_prefix("token-") {
            Some("nosub") => None,
            Some(user) => Some(user.to_string()),
            None => return Err(AuthError::InvalidToken("unknown test token".to_string())),
        };
        Ok(Claims {
            sub,
            iss: Some("https://test.example.com/".to_string()),
            exp: None,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub verifier: Arc<FakeVerifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = db::connect_in_memory()
            .await
            .expect("Failed to create database");
        let verifier = Arc::new(FakeVerifier::default());
        let state = AppState {
            db: db.clone(),
            verifier: verifier.clone(),
        };
        let router = router(state, HeaderValue::from_static(CLIENT_ORIGIN));
        Self { router, db, verifier }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("Authorization", format!("Bearer token-{}", user));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router request failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn todo_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.db)
            .await
            .expect("Failed to count todos")
    }
}
