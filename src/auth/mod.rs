//! Bearer token authentication for the todo routes.

pub mod jwks;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;
use crate::state::AppState;

pub use jwks::{AuthConfig, JwksVerifier};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no authorization token found")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("token header has no key id")]
    MissingKeyId,

    #[error("signing key {0} not found in key set")]
    UnknownKeyId(String),

    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("key set fetch rate limit exceeded")]
    RateLimited,

    #[error("token has no subject")]
    MissingSubject,
}

impl AuthError {
    /// Message returned to the caller. Verification details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "No authorization token found",
            AuthError::MissingSubject => "Invalid token or missing user ID",
            _ => "Invalid token",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Turns a bearer token into verified claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// The caller's identity, taken from the verified token's subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Unauthorized".to_string()))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?.to_string();
    let claims = state.verifier.verify(&token).await?;

    let user_id = claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or(AuthError::MissingSubject)?;

    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}
