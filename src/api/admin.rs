use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use tracing::info;

use crate::{errors::AppError, AppState};

pub async fn readiness() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        state.hits.get()
    ))
}

/// Zero the hit counter and wipe all users (and, by cascade, their sessions and chirps).
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.hits.reset();
    let deleted = state.auth.delete_all_users().await?;
    info!(deleted, "Reset application state");
    Ok(StatusCode::OK)
}
