//! Article model, its body-less projection, and submitted drafts

use serde::{Deserialize, Serialize};

use crate::date::{InvalidDate, PublishDate};
use crate::document::DELIMITER;
use crate::slug::Slug;
use crate::validation::ValidationError;
use crate::visibility::is_public;

/// A stored article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub slug: Slug,
    pub publish_date: PublishDate,
    /// Raw markdown, kept as bytes because nothing guarantees the file on
    /// disk is UTF-8.
    pub body: Vec<u8>,
}

/// Article without its body, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleMetadata {
    pub title: String,
    pub slug: Slug,
    pub publish_date: PublishDate,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        slug: Slug,
        publish_date: PublishDate,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            title: title.into(),
            slug,
            publish_date,
            body: body.into(),
        }
    }

    pub fn metadata(&self) -> ArticleMetadata {
        ArticleMetadata {
            title: self.title.clone(),
            slug: self.slug.clone(),
            publish_date: self.publish_date,
        }
    }

    /// Body as text, if it is valid UTF-8
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn is_public(&self, today: PublishDate) -> bool {
        is_public(self.publish_date, today)
    }
}

impl ArticleMetadata {
    pub fn is_public(&self, today: PublishDate) -> bool {
        is_public(self.publish_date, today)
    }
}

/// Unvalidated article fields as submitted through a form or the CLI.
///
/// Converting a draft into an [`Article`] is the only way submitted data
/// reaches the store, so every article on disk has a non-empty single-line
/// title, a fixed-width date and a valid slug.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// `YYYY-MM-DD`; blank means "today"
    #[serde(default)]
    pub publish_date: Option<String>,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            publish_date: None,
        }
    }

    pub fn with_publish_date(mut self, publish_date: impl Into<String>) -> Self {
        self.publish_date = Some(publish_date.into());
        self
    }

    /// Validate a draft for a brand new article, deriving the slug from the title.
    pub fn into_new_article(self, today: PublishDate) -> Result<Article, ValidationError> {
        let title = validate_title(&self.title)?;
        let slug = Slug::from_title(&title)?;
        let publish_date = resolve_publish_date(self.publish_date.as_deref(), today)?;
        Ok(Article::new(title, slug, publish_date, self.body))
    }

    /// Validate a full replacement of the article stored under `slug`.
    ///
    /// The slug is fixed at creation: a changed title never renames the file.
    pub fn into_article(self, slug: Slug, today: PublishDate) -> Result<Article, ValidationError> {
        let title = validate_title(&self.title)?;
        let publish_date = resolve_publish_date(self.publish_date.as_deref(), today)?;
        Ok(Article::new(title, slug, publish_date, self.body))
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::Empty { field: "title" });
    }
    if title.contains(['\n', '\r']) {
        return Err(ValidationError::InvalidFormat {
            field: "title",
            reason: "must be a single line",
        });
    }
    if title == DELIMITER {
        return Err(ValidationError::InvalidFormat {
            field: "title",
            reason: "cannot be the front matter delimiter '---'",
        });
    }
    Ok(title.to_owned())
}

fn resolve_publish_date(
    raw: Option<&str>,
    today: PublishDate,
) -> Result<PublishDate, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(today),
        Some(value) => PublishDate::parse(value)
            .map_err(|InvalidDate(value)| ValidationError::InvalidDate { value }),
    }
}
