use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::AppError, models::user::User, utils::bearer::authorization_header, AppState};

#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Require a valid bearer access token and attach its user to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = state
        .auth
        .authenticate(authorization_header(request.headers()))?;

    // A token for a deleted user is as good as no token
    let user = state.auth.current_user(user_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::InvalidToken,
        other => other,
    })?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
