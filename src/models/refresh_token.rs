use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

/// Lifecycle of a login session, derived from its refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
    Revoked,
}

#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(token: String, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            token,
            created_at: now,
            updated_at: now,
            user_id,
            expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
            revoked_at: None,
        }
    }

    /// Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if self.revoked_at.is_some() {
            SessionState::Revoked
        } else if now >= self.expires_at {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == SessionState::Active
    }
}
