//! Article repository: one `<slug>.md` file per article
//!
//! Writes go to a temporary file in the store directory which is then
//! renamed over the target, so readers see either the old or the new
//! document and never a partial one. There is no locking between writers:
//! concurrent saves of the same slug are last-write-wins.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::article::{Article, ArticleMetadata};
use crate::document;
use crate::error::{ArticleError, Result};
use crate::slug::Slug;

/// File extension of article documents
pub const FILE_EXTENSION: &str = "md";

/// Directory-backed article store
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage address of a slug
    pub fn path_for(&self, slug: &Slug) -> PathBuf {
        self.root.join(format!("{slug}.{FILE_EXTENSION}"))
    }

    /// Write the whole document for `article`, replacing any existing one.
    pub fn save(&self, article: &Article) -> Result<()> {
        let bytes = document::encode(article);
        let target = self.path_for(&article.slug);

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|err| err.error)?;

        tracing::debug!(slug = %article.slug, bytes = bytes.len(), "article saved");
        Ok(())
    }

    /// Load and decode the full article.
    ///
    /// `NotFound` when no file backs the slug, `MalformedDocument` when the
    /// header does not parse, `Io` for anything else.
    pub fn load(&self, slug: &Slug) -> Result<Article> {
        let bytes =
            fs::read(self.path_for(slug)).map_err(|err| ArticleError::from_io(slug, err))?;
        document::decode(slug, &bytes)
    }

    /// Load only the header; the body is never read.
    pub fn load_metadata(&self, slug: &Slug) -> Result<ArticleMetadata> {
        let file =
            File::open(self.path_for(slug)).map_err(|err| ArticleError::from_io(slug, err))?;
        document::decode_metadata(slug, BufReader::new(file))
    }

    /// Remove the article's file.
    pub fn delete(&self, slug: &Slug) -> Result<()> {
        fs::remove_file(self.path_for(slug)).map_err(|err| ArticleError::from_io(slug, err))?;
        tracing::debug!(slug = %slug, "article deleted");
        Ok(())
    }

    pub fn exists(&self, slug: &Slug) -> Result<bool> {
        Ok(self.path_for(slug).try_exists()?)
    }

    /// Enumerate stored slugs in directory order (unsorted).
    ///
    /// Only regular `.md` files count. Files whose stem is not a valid slug
    /// can never be addressed and are skipped, as are in-flight temp files.
    pub fn list_slugs(&self) -> Result<Vec<Slug>> {
        let mut slugs = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match Slug::new(stem) {
                Ok(slug) => slugs.push(slug),
                Err(_) => tracing::debug!(path = %path.display(), "skipping unaddressable file"),
            }
        }

        Ok(slugs)
    }
}
