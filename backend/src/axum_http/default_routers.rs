use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use tracing::debug;

pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    debug!(%method, %uri, "router: no route matched");
    (StatusCode::NOT_FOUND, "NOT_FOUND").into_response()
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}
