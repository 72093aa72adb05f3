use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError, models::user::UserResponse, utils::bearer::authorization_header, AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    /// Advisory; capped at one hour.
    expires_in_seconds: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    user: UserResponse,
    token: String,
    refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state
        .auth
        .login(&payload.email, &payload.password, payload.expires_in_seconds)
        .await?;

    Ok(Json(LoginResponse {
        user: session.user.into(),
        token: session.access_token,
        refresh_token: session.refresh_token.token,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = state.auth.refresh(authorization_header(&headers)).await?;
    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    state.auth.revoke(authorization_header(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}
