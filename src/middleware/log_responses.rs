use axum::{extract::Request, middleware::Next, response::Response};
use tracing::warn;

/// Log every response outside the 2xx range.
pub async fn log_non_ok_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    if !status.is_success() {
        warn!(%method, %uri, status = status.as_u16(), "[NON-OK] response");
    }
    response
}
