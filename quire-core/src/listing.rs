//! Article listings for the public index and the admin view
//!
//! Both listings read only the header of each file. A single unreadable or
//! malformed file aborts the whole listing with that file's error; callers
//! never receive a partial list.

use crate::article::ArticleMetadata;
use crate::date::PublishDate;
use crate::error::Result;
use crate::store::ArticleStore;
use crate::visibility::is_public;

/// Every stored article, in directory order (admin view).
pub fn list_all(store: &ArticleStore) -> Result<Vec<ArticleMetadata>> {
    store
        .list_slugs()?
        .iter()
        .map(|slug| store.load_metadata(slug))
        .collect()
}

/// Articles whose publish date is on or before `today`, in directory order.
pub fn list_published(store: &ArticleStore, today: PublishDate) -> Result<Vec<ArticleMetadata>> {
    let mut published = Vec::new();

    for slug in store.list_slugs()? {
        let meta = store.load_metadata(&slug)?;
        if is_public(meta.publish_date, today) {
            published.push(meta);
        }
    }

    Ok(published)
}

/// Newest first; ties broken by slug so the order is stable.
pub fn sort_newest_first(articles: &mut [ArticleMetadata]) {
    articles.sort_by(|a, b| {
        b.publish_date
            .cmp(&a.publish_date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}
