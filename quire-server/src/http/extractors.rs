//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use quire_core::Slug;

use super::error::ApiError;

/// Extract and validate an article slug from the path.
///
/// A slug outside `[a-z0-9-]` can never name a stored article, so it is
/// rejected as not found instead of reaching the store.
pub struct ValidSlug(pub Slug);

impl<S> FromRequestParts<S> for ValidSlug
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound { what: "Article" })?;

        let slug = Slug::new(&raw).map_err(|_| ApiError::NotFound { what: "Article" })?;
        Ok(Self(slug))
    }
}
