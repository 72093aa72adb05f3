use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{chirp::Chirp, refresh_token::RefreshToken, user::User};

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;

    /// Fails with a unique-violation database error when the email is taken.
    async fn create(&self, user: &User) -> Result<User, sqlx::Error>;

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn set_chirpy_red(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<User>, sqlx::Error>;

    /// Removes every user; their refresh tokens go with them.
    async fn delete_all(&self) -> Result<u64, sqlx::Error>;
}

/// Persistence for refresh tokens, keyed by the token value.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, record: &RefreshToken) -> Result<RefreshToken, sqlx::Error>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error>;

    async fn update_revoked_at(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, sqlx::Error>;
}

/// Persistence for chirps.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Fails with a foreign-key database error when the author does not exist.
    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp, sqlx::Error>;

    /// Every chirp, oldest first.
    async fn list_chirps(&self) -> Result<Vec<Chirp>, sqlx::Error>;

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error>;

    /// `true` when a row was removed.
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}
