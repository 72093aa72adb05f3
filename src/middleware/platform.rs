use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{errors::AppError, AppState};

/// Admin-only routes are reachable on the dev platform only.
pub async fn require_dev_platform(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.is_dev() {
        warn!(platform = %state.config.platform, "Rejected admin request outside dev");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
