//! Static assets compiled into the binary

use std::sync::Arc;

use axum::{http::header, response::IntoResponse, routing::get, Router};

use crate::http::server::AppState;

const INDEX_JS: &str = include_str!("../../../static/index.js");

/// GET /static/index.js - delete confirmation for the edit form
async fn index_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        INDEX_JS,
    )
}

/// Asset routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/static/index.js", get(index_js))
}
