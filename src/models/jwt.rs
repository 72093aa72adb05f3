// src/models/jwt.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_ISSUER: &str = "chirpy";

/// Payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String, // always TOKEN_ISSUER
    pub sub: String, // user id
    pub iat: i64,    // issued at
    pub exp: i64,    // expiration time
}

impl AccessClaims {
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, lifetime_secs: i64) -> Self {
        let iat = issued_at.timestamp();

        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat,
            exp: iat + lifetime_secs,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
