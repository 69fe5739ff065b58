//! Admin editor: list, create, edit and delete articles
//!
//! HTML forms can only GET and POST, so edit and delete share
//! `POST /admin/articles/{slug}` and are told apart by `?action=`.
//! These routes sit behind [`require_admin`](crate::http::middleware::require_admin).

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use quire_core::{listing, ArticleDraft, ArticleError, Slug, ValidationError};
use serde::Deserialize;

use super::run_blocking;
use crate::http::error::ApiError;
use crate::http::extractors::ValidSlug;
use crate::http::server::AppState;
use crate::views::{EditPage, ListPage};

/// Query for `GET /admin/articles`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `create` shows the create form instead of the list
    pub action: Option<String>,
    /// Prefill for the create form
    pub slug: Option<String>,
}

/// What a `POST /admin/articles/{slug}` does
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleAction {
    #[default]
    Edit,
    Delete,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub action: ArticleAction,
}

/// GET /admin - redirect to the article list
async fn admin_index() -> Redirect {
    Redirect::to("/admin/articles")
}

/// GET /admin/articles - all articles, or the create form with `?action=create`
async fn list_or_create_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, ApiError> {
    let today = state.clock.today();

    if query.action.as_deref() == Some("create") {
        let prefill = query.slug.as_deref().unwrap_or_default();
        let html = state.views.render_edit(&EditPage::create(prefill, today))?;
        return Ok(Html(html));
    }

    let store = state.store.clone();
    let mut articles = run_blocking(move || listing::list_all(&store)).await?;
    listing::sort_newest_first(&mut articles);

    let html = state.views.render_list(&ListPage::admin(&articles, today))?;
    Ok(Html(html))
}

/// POST /admin/articles - create from the submitted form
async fn create_article(
    State(state): State<Arc<AppState>>,
    Form(draft): Form<ArticleDraft>,
) -> Result<Response, ApiError> {
    save_new_article(&state, draft).await
}

/// The slug is derived from the title. Saving over an existing slug
/// replaces that article.
async fn save_new_article(state: &AppState, draft: ArticleDraft) -> Result<Response, ApiError> {
    let today = state.clock.today();

    let article = match draft.clone().into_new_article(today) {
        Ok(article) => article,
        Err(err) => return invalid_form(state, EditPage::from_draft(&draft, None, false), &err),
    };

    let store = state.store.clone();
    let slug = run_blocking(move || store.save(&article).map(|()| article.slug)).await?;

    tracing::info!(%slug, "article created");
    Ok(Redirect::to(&edit_url(&slug)).into_response())
}

/// GET /admin/articles/{slug} - edit form
///
/// A slug with no article yet gets a blank form that creates it on save.
async fn edit_form(
    State(state): State<Arc<AppState>>,
    ValidSlug(slug): ValidSlug,
) -> Result<Html<String>, ApiError> {
    let today = state.clock.today();
    let store = state.store.clone();
    let lookup = slug.clone();

    let page = match run_blocking(move || store.load(&lookup)).await {
        Ok(article) => EditPage::for_article(&article),
        Err(ApiError::Article(ArticleError::NotFound { .. })) => EditPage::fallback(&slug, today),
        Err(err) => return Err(err),
    };

    Ok(Html(state.views.render_edit(&page)?))
}

/// POST /admin/articles/{slug} - `?action=edit` (default) or `?action=delete`
///
/// Only the edit branch reads the form body.
async fn update_or_delete(
    State(state): State<Arc<AppState>>,
    ValidSlug(slug): ValidSlug,
    Query(query): Query<ActionQuery>,
    form: Result<Form<ArticleDraft>, FormRejection>,
) -> Result<Response, ApiError> {
    match query.action {
        ArticleAction::Edit => match form {
            Ok(Form(draft)) => update_article(state, slug, draft).await,
            Err(rejection) => Ok(rejection.into_response()),
        },
        ArticleAction::Delete => delete_article(state, slug).await,
    }
}

/// Full replacement of the article under `slug`; the title never renames it.
///
/// A slug with no stored article goes through the create flow instead, so a
/// new article always gets the slug of its title.
async fn update_article(
    state: Arc<AppState>,
    slug: Slug,
    draft: ArticleDraft,
) -> Result<Response, ApiError> {
    let today = state.clock.today();

    let store = state.store.clone();
    let lookup = slug.clone();
    if !run_blocking(move || store.exists(&lookup)).await? {
        return save_new_article(&state, draft).await;
    }

    let article = match draft.clone().into_article(slug.clone(), today) {
        Ok(article) => article,
        Err(err) => {
            let page = EditPage::from_draft(&draft, Some(&slug), true);
            return invalid_form(&state, page, &err);
        }
    };

    let store = state.store.clone();
    run_blocking(move || store.save(&article)).await?;

    tracing::info!(%slug, "article updated");
    Ok(Redirect::to(&edit_url(&slug)).into_response())
}

async fn delete_article(state: Arc<AppState>, slug: Slug) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let target = slug.clone();
    run_blocking(move || store.delete(&target)).await?;

    tracing::info!(%slug, "article deleted");
    Ok(Redirect::to("/admin/articles").into_response())
}

/// Re-render the form with the rejection message and a 400.
fn invalid_form(
    state: &AppState,
    page: EditPage,
    err: &ValidationError,
) -> Result<Response, ApiError> {
    tracing::debug!(error = %err, "article form rejected");
    let html = state.views.render_edit(&page.with_error(err))?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}

fn edit_url(slug: &Slug) -> String {
    format!("/admin/articles/{slug}")
}

/// Admin routes (auth is applied by the caller)
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin_index))
        .route("/admin/", get(admin_index))
        .route(
            "/admin/articles",
            get(list_or_create_form).post(create_article),
        )
        .route(
            "/admin/articles/{slug}",
            get(edit_form).post(update_or_delete),
        )
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::{basic_auth, body_string, location, seed, test_app};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use quire_core::{ArticleStore, PublishDate, Slug};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .unwrap()
    }

    fn store(temp: &TempDir) -> ArticleStore {
        ArticleStore::open(temp.path()).unwrap()
    }

    fn slug(value: &str) -> Slug {
        Slug::new(value).unwrap()
    }

    #[tokio::test]
    async fn admin_requires_credentials() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .uri("/admin/articles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            r#"Basic realm="Restricted""#
        );
    }

    #[tokio::test]
    async fn admin_rejects_wrong_password() {
        let temp = TempDir::new().unwrap();
        let bad = format!(
            "Basic {}",
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, "admin:nope")
        );

        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .uri("/admin/articles")
                    .header(header::AUTHORIZATION, bad)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unauthenticated_writes_touch_nothing() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Keep Me", "2024-01-01", "body");

        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/admin/articles/keep-me?action=delete")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(store(&temp).exists(&slug("keep-me")).unwrap());
    }

    #[tokio::test]
    async fn admin_index_redirects() {
        let temp = TempDir::new().unwrap();
        let response = test_app(&temp).oneshot(get("/admin")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/articles");
    }

    #[tokio::test]
    async fn admin_list_includes_drafts() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Published", "2024-01-01", "a");
        seed(&temp, "Next Year", "2099-01-01", "b");

        let response = test_app(&temp)
            .oneshot(get("/admin/articles"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("/admin/articles/published"));
        assert!(body.contains("/admin/articles/next-year"));
    }

    #[tokio::test]
    async fn create_form_is_prefilled_from_slug() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(get("/admin/articles?action=create&slug=fresh-idea"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("value=\"fresh-idea\""));
        assert!(body.contains("value=\"2024-05-01\""));
        assert!(!body.contains("form-delete-article"));
    }

    #[tokio::test]
    async fn create_derives_slug_and_defaults_date_to_today() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles",
                "title=Hello+World&body=Hi+there&publish_date=",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/articles/hello-world");

        let saved = store(&temp).load(&slug("hello-world")).unwrap();
        assert_eq!(saved.title, "Hello World");
        assert_eq!(saved.body, b"Hi there");
        assert_eq!(saved.publish_date, PublishDate::parse("2024-05-01").unwrap());
    }

    #[tokio::test]
    async fn create_with_blank_title_is_400_and_writes_nothing() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form("/admin/articles", "title=++&body=keep+this"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("title cannot be empty"));
        assert!(body.contains("keep this"));
        assert!(store(&temp).list_slugs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_bad_date_is_400() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles",
                "title=Dated&body=x&publish_date=05%2F01%2F2024",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store(&temp).list_slugs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_form_shows_stored_article() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "original body");

        let response = test_app(&temp)
            .oneshot(get("/admin/articles/hello-world"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("original body"));
        assert!(body.contains("form-delete-article"));
    }

    #[tokio::test]
    async fn edit_form_for_missing_slug_falls_back_to_blank_form() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(get("/admin/articles/brand-new"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("value=\"brand-new\""));
        assert!(!body.contains("form-delete-article"));
    }

    #[tokio::test]
    async fn fallback_form_posts_to_create() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(get("/admin/articles/brand-new"))
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains("action=\"/admin/articles\""));
        assert!(!body.contains("/admin/articles/brand-new?action=edit"));
    }

    #[tokio::test]
    async fn edit_of_missing_slug_derives_slug_from_title() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles/brand-new?action=edit",
                "title=Totally+Different&body=fresh",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/articles/totally-different");

        let store = store(&temp);
        assert!(!store.exists(&slug("brand-new")).unwrap());
        let saved = store.load(&slug("totally-different")).unwrap();
        assert_eq!(saved.title, "Totally Different");
        assert_eq!(saved.body, b"fresh");
    }

    #[tokio::test]
    async fn edit_of_missing_slug_with_blank_title_is_400() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form("/admin/articles/brand-new", "title=+&body=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store(&temp).list_slugs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_slug_when_title_changes() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "v1");

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles/hello-world?action=edit",
                "title=Goodbye+World&body=v2&publish_date=2024-06-01",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/articles/hello-world");

        let store = store(&temp);
        let saved = store.load(&slug("hello-world")).unwrap();
        assert_eq!(saved.title, "Goodbye World");
        assert_eq!(saved.body, b"v2");
        assert_eq!(saved.publish_date, PublishDate::parse("2024-06-01").unwrap());
        assert!(!store.exists(&slug("goodbye-world")).unwrap());
    }

    #[tokio::test]
    async fn update_defaults_to_edit_action() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "v1");

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles/hello-world",
                "title=Hello+World&body=v2",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let saved = store(&temp).load(&slug("hello-world")).unwrap();
        assert_eq!(saved.body, b"v2");
    }

    #[tokio::test]
    async fn update_with_invalid_title_keeps_old_article() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "v1");

        let response = test_app(&temp)
            .oneshot(post_form(
                "/admin/articles/hello-world?action=edit",
                "title=---&body=v2",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("form-delete-article"));
        let saved = store(&temp).load(&slug("hello-world")).unwrap();
        assert_eq!(saved.body, b"v1");
    }

    #[tokio::test]
    async fn delete_removes_article() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "bye");

        let response = test_app(&temp)
            .oneshot(post_form("/admin/articles/hello-world?action=delete", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/articles");
        assert!(!store(&temp).exists(&slug("hello-world")).unwrap());

        // Public fetch now falls into the create flow
        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .uri("/articles/hello-world")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn delete_needs_no_form_body() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "bye");

        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/admin/articles/hello-world?action=delete")
                    .header(header::AUTHORIZATION, basic_auth())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(!store(&temp).exists(&slug("hello-world")).unwrap());
    }

    #[tokio::test]
    async fn edit_without_form_body_is_rejected() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Hello World", "2024-05-01", "v1");

        let response = test_app(&temp)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/admin/articles/hello-world?action=edit")
                    .header(header::AUTHORIZATION, basic_auth())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(store(&temp).load(&slug("hello-world")).unwrap().body, b"v1");
    }

    #[tokio::test]
    async fn delete_missing_is_404() {
        let temp = TempDir::new().unwrap();

        let response = test_app(&temp)
            .oneshot(post_form("/admin/articles/ghost?action=delete", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_list_fails_when_a_document_is_corrupt() {
        let temp = TempDir::new().unwrap();
        seed(&temp, "Fine", "2024-01-01", "ok");
        fs::write(temp.path().join("broken.md"), "---\nBroken\nyesterday\n---\n").unwrap();

        let response = test_app(&temp)
            .oneshot(get("/admin/articles"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
