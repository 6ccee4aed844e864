use std::env;
use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::auth::AuthConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub client_url: String,
    pub auth: AuthConfig,
    pub environment: Environment,
}

impl Config {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let client_url = lookup("CLIENT_URL").unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string());

        let environment = match lookup("APP_ENV") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "APP_ENV", value })?,
            None => Environment::Development,
        };

        let domain = lookup("AUTH0_DOMAIN").ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;
        let audience = lookup("AUTH0_AUDIENCE").ok_or(ConfigError::Missing("AUTH0_AUDIENCE"))?;

        Ok(Self {
            database_url,
            port,
            client_url,
            auth: AuthConfig::for_domain(&domain, &audience),
            environment,
        })
    }

    /// `CLIENT_URL` as a CORS origin header value.
    pub fn client_origin(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(self.client_url.trim_end_matches('/')).map_err(|_| {
            ConfigError::Invalid {
                key: "CLIENT_URL",
                value: self.client_url.clone(),
            }
        })
    }
}
