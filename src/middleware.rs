use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::env;
use tracing::warn;

/// Guards the import endpoints with a shared secret
///
/// When the `AUTHORIZATION` environment variable is set and non-empty, the
/// request's `Authorization` header must carry exactly that value. Otherwise
/// the check is skipped. The variable is read on every request.
pub async fn auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let secret = env::var("AUTHORIZATION").unwrap_or_default();
    if secret.is_empty() {
        return Ok(next.run(request).await);
    }

    let provided = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if provided != Some(secret.as_str()) {
        warn!(path = %request.uri().path(), "rejected import without valid authorization");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "code": "unauthorized",
                "message": "Invalid or missing authorization header"
            })),
        )
            .into_response());
    }

    Ok(next.run(request).await)
}
