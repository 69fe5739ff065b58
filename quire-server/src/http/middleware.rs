//! Basic auth gate for the admin routes

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::Credentials;

/// Let the request through only if the authorizer accepts its credentials.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(Credentials::from_basic_header);

    match credentials {
        Some(credentials) if state.authorizer.is_authorized(&credentials) => {
            tracing::debug!(user = %credentials.username, "admin request authorized");
            Ok(next.run(request).await)
        }
        Some(credentials) => {
            tracing::warn!(user = %credentials.username, "rejected admin credentials");
            Err(ApiError::Unauthorized)
        }
        None => Err(ApiError::Unauthorized),
    }
}
