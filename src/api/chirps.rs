use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{errors::AppError, middleware::auth::CurrentUser, models::chirp::Chirp, AppState};

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    #[serde(default)]
    body: String,
}

pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>), AppError> {
    let chirp = state.chirps.create(current_user.0.id, &payload.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

pub async fn list_chirps(State(state): State<AppState>) -> Result<Json<Vec<Chirp>>, AppError> {
    Ok(Json(state.chirps.list().await?))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<Uuid>,
) -> Result<Json<Chirp>, AppError> {
    Ok(Json(state.chirps.get(chirp_id).await?))
}

pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(chirp_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.chirps.delete(current_user.0.id, chirp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
