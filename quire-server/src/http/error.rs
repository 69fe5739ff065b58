//! API error types with IntoResponse
//!
//! Errors become small HTML pages with a status code chosen from the core
//! error variant. Internal failures are logged and shown generically.

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use handlebars::html_escape;
use quire_core::{ArticleError, RenderError};

use crate::views::ViewError;

/// Handler error with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Storage, validation or visibility failure from the core
    Article(ArticleError),

    /// Markdown body could not be rendered (500)
    Render(RenderError),

    /// Page template failed (500, logged)
    View(ViewError),

    /// No such route resource (404)
    NotFound { what: &'static str },

    /// Missing or rejected admin credentials (401)
    Unauthorized,

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Article(err) => match err {
                ArticleError::NotFound { slug } => (
                    StatusCode::NOT_FOUND,
                    format!("There is no article called '{slug}'."),
                ),
                ArticleError::Unpublished { .. } => (
                    StatusCode::FORBIDDEN,
                    "This article is not published yet.".to_owned(),
                ),
                ArticleError::MalformedDocument { slug, source } => {
                    tracing::error!(%slug, error = %source, "malformed article document");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("The stored article '{slug}' could not be read."),
                    )
                }
                ArticleError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                ArticleError::Io { source } => {
                    tracing::error!(error = %source, "storage I/O error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred.".to_owned(),
                    )
                }
            },
            Self::Render(e) => {
                tracing::error!(error = %e, "markdown rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The article body could not be rendered.".to_owned(),
                )
            }
            Self::View(e) => {
                tracing::error!(error = %e, "template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The page could not be rendered.".to_owned(),
                )
            }
            Self::NotFound { what } => (StatusCode::NOT_FOUND, format!("{what} not found.")),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized.".to_owned()),
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_owned(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = Html(error_page(status, &message));

        if matches!(self, Self::Unauthorized) {
            return (
                status,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="Restricted""#)],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

fn error_page(status: StatusCode, message: &str) -> String {
    let heading = html_escape(status.canonical_reason().unwrap_or("Error"));
    let message = html_escape(message);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{heading}</title></head>\n\
         <body>\n<h1>{heading}</h1>\n<p>{message}</p>\n<p><a href=\"/articles\">Back to articles</a></p>\n</body>\n</html>\n"
    )
}

impl From<ArticleError> for ApiError {
    fn from(e: ArticleError) -> Self {
        Self::Article(e)
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<ViewError> for ApiError {
    fn from(e: ViewError) -> Self {
        Self::View(e)
    }
}
