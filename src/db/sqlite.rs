use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::store::{ChirpStore, RefreshTokenStore, UserStore};
use crate::models::{chirp::Chirp, refresh_token::RefreshToken, user::User};

const USER_COLUMNS: &str = "id, created_at, updated_at, email, hashed_password, is_chirpy_red";
const REFRESH_TOKEN_COLUMNS: &str = "token, created_at, updated_at, user_id, expires_at, revoked_at";
const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Every store over one SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up user by email");
                e
            })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up user by id");
                e
            })
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<User, sqlx::Error> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_chirpy_red)
        .fetch_one(&self.pool)
        .await?;

        info!("Created user");
        Ok(created)
    }

    #[instrument(skip(self, email, hashed_password))]
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = ?, hashed_password = ?, updated_at = ? WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(hashed_password)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    #[instrument(skip(self))]
    async fn set_chirpy_red(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<User>, sqlx::Error> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            warn!("No user to upgrade");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        info!(deleted = result.rows_affected(), "Deleted all users");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RefreshTokenStore for SqliteStore {
    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn insert(&self, record: &RefreshToken) -> Result<RefreshToken, sqlx::Error> {
        let stored = sqlx::query_as::<_, RefreshToken>(&format!(
            "INSERT INTO refresh_tokens ({REFRESH_TOKEN_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {REFRESH_TOKEN_COLUMNS}"
        ))
        .bind(&record.token)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to store refresh token");
            e
        })?;

        info!("Stored refresh token");
        Ok(stored)
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error> {
        let found = sqlx::query_as::<_, RefreshToken>(&format!(
            "SELECT {REFRESH_TOKEN_COLUMNS} FROM refresh_tokens WHERE token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        if found.is_none() {
            warn!("Refresh token not found");
        }
        Ok(found)
    }

    #[instrument(skip(self, token))]
    async fn update_revoked_at(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(&format!(
            "UPDATE refresh_tokens SET revoked_at = ?, updated_at = ? WHERE token = ? \
             RETURNING {REFRESH_TOKEN_COLUMNS}"
        ))
        .bind(revoked_at)
        .bind(revoked_at)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl ChirpStore for SqliteStore {
    #[instrument(skip(self, chirp), fields(chirp_id = %chirp.id, user_id = %chirp.user_id))]
    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp, sqlx::Error> {
        let created = sqlx::query_as::<_, Chirp>(&format!(
            "INSERT INTO chirps ({CHIRP_COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {CHIRP_COLUMNS}"
        ))
        .bind(chirp.id)
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .bind(&chirp.body)
        .bind(chirp.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to store chirp");
            e
        })?;

        info!("Created chirp");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_chirps(&self) -> Result<Vec<Chirp>, sqlx::Error> {
        sqlx::query_as::<_, Chirp>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(skip(self))]
    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error> {
        sqlx::query_as::<_, Chirp>(&format!("SELECT {CHIRP_COLUMNS} FROM chirps WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!("No chirp to delete");
        }
        Ok(result.rows_affected() > 0)
    }
}
