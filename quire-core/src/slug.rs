//! Slug derivation and validation
//!
//! A slug is both the article's primary key and its file name, so the
//! charset is restricted to `[a-z0-9-]`. Anything outside it (including
//! `.` and `/`) is rejected, which also keeps path parameters from
//! escaping the store directory.

use std::{fmt, str::FromStr};

use ::slug::slugify;
use serde::Serialize;

use crate::validation::ValidationError;

/// Derive a slug from a title.
///
/// Lowercases, transliterates to ASCII, collapses every run of
/// non-alphanumeric characters into a single hyphen and trims hyphens at
/// both ends. The result matches `[a-z0-9-]*` and is idempotent:
/// `make_slug(&make_slug(x)) == make_slug(x)`. A title with no usable
/// characters yields an empty string, which [`Slug::from_title`] rejects.
pub fn make_slug(title: &str) -> String {
    slugify(title)
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Validated article slug
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate an existing slug, e.g. one taken from a URL path.
    ///
    /// # Example
    /// ```
    /// use quire_core::Slug;
    ///
    /// assert!(Slug::new("hello-world").is_ok());
    /// assert!(Slug::new("Hello").is_err());
    /// assert!(Slug::new("../etc/passwd").is_err());
    /// ```
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::Empty { field: "slug" });
        }

        if !value.chars().all(is_slug_char) {
            return Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "must contain only lowercase ascii letters, digits and hyphens",
            });
        }

        Ok(Self(value.to_owned()))
    }

    /// Derive and validate a slug from a title.
    pub fn from_title(title: &str) -> Result<Self, ValidationError> {
        Self::new(&make_slug(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}
