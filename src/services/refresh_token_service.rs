use std::sync::Arc;

use rand::{rngs::OsRng, RngCore};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::{RefreshTokenStore, UserStore};
use crate::errors::AppError;
use crate::models::{refresh_token::RefreshToken, user::User};
use crate::utils::clock::Clock;

/// Bytes of CSPRNG output per token (hex-encoded to 64 characters).
const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct RefreshTokenService {
    tokens: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenService {
    pub fn new(
        tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens,
            users,
            clock,
        }
    }

    /// Persist a fresh token for `user_id`, valid for 60 days.
    #[instrument(skip(self))]
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshToken, AppError> {
        let record = RefreshToken::new(generate_token(), user_id, self.clock.now());
        let stored = self.tokens.insert(&record).await?;

        info!(expires_at = %stored.expires_at, "Issued refresh token");
        Ok(stored)
    }

    pub async fn lookup(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        Ok(self.tokens.find_by_token(token).await?)
    }

    /// Owner of `token`. Validity is the caller's concern.
    #[instrument(skip(self, token))]
    pub async fn resolve_user(&self, token: &str) -> Result<User, AppError> {
        let record = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or(AppError::NotFound("Refresh token"))?;

        self.users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// Stamp `revoked_at` with the current time. Repeating it moves the stamp.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<RefreshToken, AppError> {
        match self.tokens.update_revoked_at(token, self.clock.now()).await? {
            Some(record) => {
                info!(user_id = %record.user_id, "Revoked refresh token");
                Ok(record)
            }
            None => {
                warn!("Attempt to revoke unknown refresh token");
                Err(AppError::NotFound("Refresh token"))
            }
        }
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
