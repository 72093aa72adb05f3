use dotenv::dotenv;
use std::env;
use thiserror::Error;

use crate::services::jwt_service::MAX_ACCESS_TOKEN_TTL_SECS;

pub const DEV_PLATFORM: &str = "dev";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read once at startup and handed to the services.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub platform: String,
    pub polka_key: String,
    pub bind_addr: String,
    pub access_token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file
        dotenv().ok();

        let access_token_ttl_secs = match env::var("ACCESS_TOKEN_TTL_SECS") {
            Ok(value) => value.parse::<i64>().map_err(|_| ConfigError::Invalid {
                key: "ACCESS_TOKEN_TTL_SECS",
                value,
            })?,
            Err(_) => MAX_ACCESS_TOKEN_TTL_SECS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            platform: required("PLATFORM")?,
            polka_key: required("POLKA_KEY")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            access_token_ttl_secs: access_token_ttl_secs.clamp(0, MAX_ACCESS_TOKEN_TTL_SECS),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("platform", &self.platform)
            .field("polka_key", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .finish()
    }
}
