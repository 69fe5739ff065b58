//! Publication gating
//!
//! An article is public once its publish date is today or earlier. Future
//! dated articles are drafts: hidden from public listings, and a direct
//! public fetch reports `Unpublished` rather than `NotFound` because the
//! file does exist.

use crate::article::Article;
use crate::date::PublishDate;
use crate::error::{ArticleError, Result};
use crate::slug::Slug;
use crate::store::ArticleStore;

/// `publish_date <= today`.
///
/// `PublishDate` orders chronologically, which for the fixed-width
/// `YYYY-MM-DD` form is the same as comparing the persisted text.
pub fn is_public(publish_date: PublishDate, today: PublishDate) -> bool {
    publish_date <= today
}

/// Pass a public article through, or reject a draft with `Unpublished`.
pub fn ensure_public(article: Article, today: PublishDate) -> Result<Article> {
    if article.is_public(today) {
        Ok(article)
    } else {
        Err(ArticleError::Unpublished {
            slug: article.slug,
            publish_date: article.publish_date,
        })
    }
}

/// Public direct fetch: load, then gate on the publish date.
pub fn fetch_published(store: &ArticleStore, slug: &Slug, today: PublishDate) -> Result<Article> {
    let article = store.load(slug)?;
    ensure_public(article, today)
}
