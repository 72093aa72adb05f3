// src/services/jwt_service.rs
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::jwt::AccessClaims;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::jwt::{decode_claims, encode_claims};

/// Hard cap on access-token lifetime, whatever the caller asks for.
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Issues and validates access tokens signed with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    enc_key: EncodingKey,
    dec_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    pub fn new(secret_key: &str) -> Self {
        Self::with_clock(secret_key, Arc::new(SystemClock))
    }

    pub fn with_clock(secret_key: &str, clock: Arc<dyn Clock>) -> Self {
        let enc_key = EncodingKey::from_secret(secret_key.as_bytes());
        let dec_key = DecodingKey::from_secret(secret_key.as_bytes());

        Self {
            enc_key,
            dec_key,
            clock,
        }
    }

    /* ---------- PUBLIC API ---------- */

    /// Sign a token for `user_id`, valid for `lifetime_secs` clamped to `0..=3600`.
    #[instrument(skip(self))]
    pub fn issue(&self, user_id: Uuid, lifetime_secs: i64) -> Result<String, AppError> {
        let lifetime = lifetime_secs.clamp(0, MAX_ACCESS_TOKEN_TTL_SECS);
        let claims = AccessClaims::new(user_id, self.clock.now(), lifetime);

        encode_claims(&claims, &self.enc_key).map_err(|e| {
            error!(error = %e, "Failed to sign access token");
            AppError::Internal("could not sign access token".to_string())
        })
    }

    /// Return the user id of a valid, unexpired token.
    ///
    /// Every failure is reported as the same [`AppError::InvalidToken`].
    #[instrument(skip(self, token))]
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = decode_claims(token, &self.dec_key).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            AppError::InvalidToken
        })?;

        if claims.is_expired_at(self.clock.now()) {
            debug!(exp = claims.exp, "Rejected expired access token");
            return Err(AppError::InvalidToken);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| {
            debug!("Rejected access token with malformed subject");
            AppError::InvalidToken
        })
    }
}

/// One-shot issuance against `secret`.
pub fn issue_access_token(user_id: Uuid, lifetime_secs: i64, secret: &str) -> Result<String, AppError> {
    JwtService::new(secret).issue(user_id, lifetime_secs)
}

/// One-shot validation against `secret`.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
    JwtService::new(secret).validate(token)
}
