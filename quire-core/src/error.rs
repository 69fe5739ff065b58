/// Structured error types for quire-core storage operations.
///
/// Uses `thiserror` so the server and CLI can match on the variant that
/// drives their presentation (redirect-to-create for `NotFound`, a
/// "not yet published" page for `Unpublished`, and so on). The core itself
/// never decides how an error is shown.
use std::io;
use thiserror::Error;

use crate::date::PublishDate;
use crate::document::DocumentError;
use crate::slug::Slug;
use crate::validation::ValidationError;

/// Main error type for article operations
#[derive(Error, Debug)]
pub enum ArticleError {
    /// No file backs this slug
    #[error("article '{slug}' not found")]
    NotFound { slug: Slug },

    /// The fixed front matter header could not be parsed
    #[error("article '{slug}' is malformed: {source}")]
    MalformedDocument {
        slug: Slug,
        #[source]
        source: DocumentError,
    },

    /// The article exists but its publish date is still in the future
    #[error("article '{slug}' is not published until {publish_date}")]
    Unpublished {
        slug: Slug,
        publish_date: PublishDate,
    },

    /// Any other filesystem failure
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Submitted article data was rejected before any write
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for quire-core operations
pub type Result<T> = std::result::Result<T, ArticleError>;

impl ArticleError {
    /// Create a not found error
    pub fn not_found(slug: &Slug) -> Self {
        Self::NotFound { slug: slug.clone() }
    }

    /// Create a malformed document error
    pub fn malformed(slug: &Slug, source: DocumentError) -> Self {
        Self::MalformedDocument {
            slug: slug.clone(),
            source,
        }
    }

    /// Map an I/O error on a slug's file, turning a missing file into `NotFound`
    pub fn from_io(slug: &Slug, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::not_found(slug)
        } else {
            Self::Io { source: err }
        }
    }

    /// True when the error means "no such article"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug() -> Slug {
        Slug::new("hello-world").unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ArticleError::not_found(&slug());
        assert_eq!(err.to_string(), "article 'hello-world' not found");

        let err = ArticleError::Unpublished {
            slug: slug(),
            publish_date: PublishDate::parse("2099-01-01").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "article 'hello-world' is not published until 2099-01-01"
        );
    }

    #[test]
    fn test_missing_file_becomes_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = ArticleError::from_io(&slug(), io_err);
        assert!(err.is_not_found());

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ArticleError::from_io(&slug(), io_err);
        assert!(matches!(err, ArticleError::Io { .. }));
    }
}
