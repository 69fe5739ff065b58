//! Markdown to HTML rendering
//!
//! The renderer is built once from [`RenderOptions`] and handed to whoever
//! displays articles. Rendering never touches the store: a failure here is
//! a [`RenderError`], separate from the storage errors in [`crate::error`].

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use thiserror::Error;

/// Markdown extensions and HTML policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    /// Pass raw HTML and link targets with any URL scheme through as written
    pub allow_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            allow_raw_html: false,
        }
    }
}

impl RenderOptions {
    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options
    }
}

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("article body is not valid UTF-8 (first bad byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("failed to write rendered markup")]
    Write(#[from] std::fmt::Error),
}

/// Converts stored markdown bodies into markup safe to embed in a page
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render a raw body.
    ///
    /// Unless `allow_raw_html` is set, inline and block HTML in the source
    /// is emitted as escaped text, and link or image targets with a scheme
    /// other than `http`, `https` or `mailto` are replaced by `#`.
    pub fn render(&self, body: &[u8]) -> Result<String, RenderError> {
        let text = std::str::from_utf8(body).map_err(|err| RenderError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        })?;

        let allow_raw_html = self.options.allow_raw_html;
        let events = Parser::new_ext(text, self.options.parser_options()).map(move |event| {
            match event {
                Event::Html(raw) | Event::InlineHtml(raw) if !allow_raw_html => Event::Text(raw),
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) if !allow_raw_html && !is_safe_url(&dest_url) => Event::Start(Tag::Link {
                    link_type,
                    dest_url: CowStr::Borrowed(BLOCKED_URL),
                    title,
                    id,
                }),
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) if !allow_raw_html && !is_safe_url(&dest_url) => Event::Start(Tag::Image {
                    link_type,
                    dest_url: CowStr::Borrowed(BLOCKED_URL),
                    title,
                    id,
                }),
                other => other,
            }
        });

        let mut out = String::with_capacity(text.len() + text.len() / 2);
        html::write_html_fmt(&mut out, events)?;
        Ok(out)
    }
}

/// Replacement target for links with a disallowed scheme
const BLOCKED_URL: &str = "#";

const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Relative URLs and the schemes in [`SAFE_SCHEMES`].
///
/// Whitespace and control characters are dropped before the scheme is read,
/// matching how browsers parse `java\tscript:`.
fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();

    match cleaned.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(end) if cleaned[end..].starts_with(':') => {
            let scheme = &cleaned[..end];
            SAFE_SCHEMES
                .iter()
                .any(|safe| scheme.eq_ignore_ascii_case(safe))
        }
        _ => true,
    }
}
