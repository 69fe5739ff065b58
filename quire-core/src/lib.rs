//! quire-core: file-backed article storage for the quire server
//!
//! Articles live one per file as `<slug>.md` under a single store directory.
//! Each file starts with a fixed four-line front matter header followed by
//! the raw markdown body:
//!
//! ```text
//! ---
//! Hello World
//! 2024-05-01
//! ---
//! Body text, stored verbatim.
//! ```
//!
//! Everything here is synchronous blocking I/O with no shared mutable state;
//! the store root is the only thing fixed at startup.

pub mod article;
pub mod date;
pub mod document;
pub mod error;
pub mod listing;
pub mod render;
pub mod slug;
pub mod store;
pub mod validation;
pub mod visibility;

pub use article::{Article, ArticleDraft, ArticleMetadata};
pub use date::{Clock, FixedClock, InvalidDate, PublishDate, SystemClock};
pub use document::DocumentError;
pub use error::{ArticleError, Result};
pub use render::{MarkdownRenderer, RenderError, RenderOptions};
pub use slug::{make_slug, Slug};
pub use store::ArticleStore;
pub use validation::ValidationError;
