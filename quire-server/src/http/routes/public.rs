//! Public pages: published articles only

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use quire_core::{listing, visibility, ArticleError, Slug};

use super::run_blocking;
use crate::http::error::ApiError;
use crate::http::extractors::ValidSlug;
use crate::http::server::AppState;
use crate::views::{ArticlePage, ListPage};

/// GET / - redirect to the article index
async fn index() -> Redirect {
    Redirect::to("/articles")
}

/// GET /articles - published articles, newest first
async fn list_published(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let today = state.clock.today();
    let store = state.store.clone();

    let mut articles = run_blocking(move || listing::list_published(&store, today)).await?;
    listing::sort_newest_first(&mut articles);

    let html = state
        .views
        .render_list(&ListPage::public(&articles, today))?;
    Ok(Html(html))
}

/// GET /articles/{slug} - a single published article
///
/// A missing article sends the visitor to the admin create form for that
/// slug; a future-dated one is refused with 403.
async fn view_article(
    State(state): State<Arc<AppState>>,
    ValidSlug(slug): ValidSlug,
) -> Result<Response, ApiError> {
    let today = state.clock.today();
    let store = state.store.clone();
    let lookup = slug.clone();

    let article =
        match run_blocking(move || visibility::fetch_published(&store, &lookup, today)).await {
            Ok(article) => article,
            Err(ApiError::Article(ArticleError::NotFound { .. })) => {
                tracing::debug!(%slug, "article missing, redirecting to create form");
                return Ok(Redirect::to(&create_url(&slug)).into_response());
            }
            Err(err) => return Err(err),
        };

    let body_html = state.renderer.render(&article.body)?;
    let html = state
        .views
        .render_article(&ArticlePage::new(&article, &body_html))?;
    Ok(Html(html).into_response())
}

fn create_url(slug: &Slug) -> String {
    format!("/admin/articles?action=create&slug={slug}")
}

/// Public routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/articles", get(list_published))
        .route("/articles/{slug}", get(view_article))
}
