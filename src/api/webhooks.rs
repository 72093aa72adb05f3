use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use constant_time_eq::constant_time_eq;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    errors::AppError,
    utils::bearer::{authorization_header, extract_api_key},
    AppState,
};

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaEvent {
    event: String,
    #[serde(default)]
    data: PolkaEventData,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolkaEventData {
    user_id: Option<Uuid>,
}

/// Payment-provider callback. Only `user.upgraded` has an effect; every other
/// event is acknowledged and ignored.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PolkaEvent>,
) -> Result<StatusCode, AppError> {
    let key = extract_api_key(authorization_header(&headers))?;
    if !api_key_matches(key, &state.config.polka_key) {
        warn!("Rejected webhook with wrong API key");
        return Err(AppError::InvalidApiKey);
    }

    if payload.event != USER_UPGRADED {
        debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = payload
        .data
        .user_id
        .ok_or_else(|| AppError::Validation("Event is missing 'data.userId'".to_string()))?;
    state.auth.upgrade_to_chirpy_red(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn api_key_matches(provided: &str, expected: &str) -> bool {
    constant_time_eq(provided.as_bytes(), expected.as_bytes())
}
