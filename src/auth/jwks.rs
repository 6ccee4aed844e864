//! RS256 token verification against a remote JSON Web Key Set.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{AuthError, Claims, TokenVerifier};

const DEFAULT_JWKS_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(5).unwrap();
const DEFAULT_KEY_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_uri: String,
    pub jwks_requests_per_minute: NonZeroU32,
    pub key_cache_ttl: Duration,
}

impl AuthConfig {
    /// Issuer and key set location for an identity-provider domain such as
    /// `tenant.eu.auth0.com`.
    pub fn for_domain(domain: &str, audience: &str) -> Self {
        let domain = domain
            .trim_start_matches("https://")
            .trim_end_matches('/');

        Self {
            issuer: format!("https://{}/", domain),
            audience: audience.to_string(),
            jwks_uri: format!("https://{}/.well-known/jwks.json", domain),
            jwks_requests_per_minute: DEFAULT_JWKS_REQUESTS_PER_MINUTE,
            key_cache_ttl: DEFAULT_KEY_CACHE_TTL,
        }
    }

    pub fn with_jwks_uri(mut self, jwks_uri: impl Into<String>) -> Self {
        self.jwks_uri = jwks_uri.into();
        self
    }

    pub fn with_jwks_requests_per_minute(mut self, limit: NonZeroU32) -> Self {
        self.jwks_requests_per_minute = limit;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

pub struct JwksVerifier {
    config: AuthConfig,
    client: Client,
    keys: Cache<String, Arc<DecodingKey>>,
    fetch_limiter: DefaultDirectRateLimiter,
}

impl JwksVerifier {
    pub fn new(config: AuthConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(JWKS_FETCH_TIMEOUT).build()?;
        let keys = Cache::builder()
            .time_to_live(config.key_cache_ttl)
            .max_capacity(64)
            .build();
        let fetch_limiter = RateLimiter::direct(Quota::per_minute(config.jwks_requests_per_minute));

        Ok(Self {
            config,
            client,
            keys,
            fetch_limiter,
        })
    }

    async fn decoding_key(&self, kid: &str) -> Result<Arc<DecodingKey>, AuthError> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.keys
            .get(kid)
            .await
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        if self.fetch_limiter.check().is_err() {
            warn!("jwks fetch rate limit reached, not contacting {}", self.config.jwks_uri);
            return Err(AuthError::RateLimited);
        }

        debug!("fetching jwks from {}", self.config.jwks_uri);
        let response = self
            .client
            .get(&self.config.jwks_uri)
            .send()
            .await
            .map_err(|e| {
                warn!("jwks request failed: {}", e);
                AuthError::KeySetUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("jwks endpoint returned {}", status);
            return Err(AuthError::KeySetUnavailable(format!("status {}", status)));
        }

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("malformed key set: {}", e)))?;

        for jwk in jwks.keys {
            let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
                continue;
            };
            if jwk.kty != "RSA" {
                continue;
            }
            match DecodingKey::from_rsa_components(&n, &e) {
                Ok(key) => self.keys.insert(kid, Arc::new(key)).await,
                Err(err) => warn!("skipping unusable jwk {}: {}", kid, err),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwksVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
