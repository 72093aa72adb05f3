use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    errors::AppError, middleware::auth::CurrentUser, models::user::UserResponse, AppState,
};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.auth.register(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .auth
        .update_credentials(current_user.0.id, &payload.email, &payload.password)
        .await?;
    Ok(Json(user.into()))
}
