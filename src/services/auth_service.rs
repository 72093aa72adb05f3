use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::{RefreshTokenStore, UserStore};
use crate::errors::AppError;
use crate::models::{
    refresh_token::{RefreshToken, SessionState},
    user::User,
};
use crate::services::jwt_service::JwtService;
use crate::services::refresh_token_service::RefreshTokenService;
use crate::utils::bearer::extract_bearer_token;
use crate::utils::clock::Clock;
use crate::utils::password::{check_password_hash, hash_password};

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

/// Login, refresh and revocation on top of the password, JWT and
/// refresh-token primitives.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: RefreshTokenService,
    jwt_service: JwtService,
    clock: Arc<dyn Clock>,
    access_token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn RefreshTokenStore>,
        jwt_secret: &str,
        access_token_ttl_secs: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            refresh_tokens: RefreshTokenService::new(tokens, users.clone(), clock.clone()),
            jwt_service: JwtService::with_clock(jwt_secret, clock.clone()),
            users,
            clock,
            access_token_ttl_secs,
        }
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenService {
        &self.refresh_tokens
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    #[instrument(skip(self, email, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        require_credentials(email, password)?;

        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hash_password(password)?,
            is_chirpy_red: false,
        };

        let created = self.users.create(&user).await.map_err(conflict_on_duplicate_email)?;
        info!(user_id = %created.id, "Registered user");
        Ok(created)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, email, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<i64>,
    ) -> Result<LoginSession, AppError> {
        // Find user by email
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        // Verify password
        if !check_password_hash(&user.hashed_password, password) {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        // A non-positive lifetime falls back to the configured default
        let ttl = requested_ttl_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(self.access_token_ttl_secs);
        let access_token = self.jwt_service.issue(user.id, ttl)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from an active refresh token. The refresh token
    /// itself is left untouched.
    #[instrument(skip(self, authorization))]
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, AppError> {
        let token = extract_bearer_token(authorization)?;

        let record = self
            .refresh_tokens
            .lookup(token)
            .await?
            .ok_or(AppError::InvalidRefreshToken)?;

        let state = record.state_at(self.clock.now());
        if state != SessionState::Active {
            warn!(?state, user_id = %record.user_id, "Refused refresh with unusable token");
            return Err(AppError::InvalidRefreshToken);
        }

        let user = self.refresh_tokens.resolve_user(token).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::InvalidRefreshToken,
            other => other,
        })?;

        self.jwt_service.issue(user.id, self.access_token_ttl_secs)
    }

    #[instrument(skip(self, authorization))]
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), AppError> {
        let token = extract_bearer_token(authorization)?;

        match self.refresh_tokens.revoke(token).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::InvalidRefreshToken),
            Err(e) => Err(e),
        }
    }

    /// User id behind a bearer access token.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid, AppError> {
        let token = extract_bearer_token(authorization)?;
        self.jwt_service.validate(token)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    #[instrument(skip(self, email, password))]
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        require_credentials(email, password)?;

        let hashed_password = hash_password(password)?;
        self.users
            .update_credentials(user_id, email, &hashed_password, self.clock.now())
            .await
            .map_err(conflict_on_duplicate_email)?
            .ok_or(AppError::NotFound("User"))
    }

    #[instrument(skip(self))]
    pub async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<User, AppError> {
        let user = self
            .users
            .set_chirpy_red(user_id, self.clock.now())
            .await?
            .ok_or(AppError::NotFound("User"))?;

        info!(user_id = %user.id, "Upgraded user to Chirpy Red");
        Ok(user)
    }

    pub async fn delete_all_users(&self) -> Result<u64, AppError> {
        Ok(self.users.delete_all().await?)
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Request is missing 'email' or 'password'".to_string(),
        ));
    }
    Ok(())
}

fn conflict_on_duplicate_email(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Email is already registered".to_string())
        }
        other => AppError::Database(other),
    }
}
