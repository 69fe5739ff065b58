//! Front matter codec for article files
//!
//! Handles the fixed four-line header used by every article file:
//! ```text
//! ---
//! <title>
//! <YYYY-MM-DD>
//! ---
//! <body, stored verbatim>
//! ```
//!
//! The header is read by position, never by scanning for delimiters. A
//! title line equal to `---`, a missing line, or a date that does not parse
//! is an error rather than a silent misparse.

use std::io::{self, BufRead};

use thiserror::Error;

use crate::article::{Article, ArticleMetadata};
use crate::date::{InvalidDate, PublishDate};
use crate::error::{ArticleError, Result};
use crate::slug::Slug;

/// Front matter delimiter line
pub const DELIMITER: &str = "---";

/// Ways the fixed header can be violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("line {line}: document ended before the {expected}")]
    MissingLine { line: usize, expected: &'static str },

    #[error("line {line}: expected front matter delimiter '---'")]
    ExpectedDelimiter { line: usize },

    #[error("line {line}: title is empty")]
    EmptyTitle { line: usize },

    #[error("line {line}: title line is the front matter delimiter")]
    TitleIsDelimiter { line: usize },

    #[error("line {line}: {source}")]
    InvalidDate {
        line: usize,
        #[source]
        source: InvalidDate,
    },

    #[error("line {line}: header is not valid UTF-8")]
    InvalidUtf8 { line: usize },
}

/// The parsed front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub publish_date: PublishDate,
}

impl Header {
    /// Append the four header lines to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let header = format!(
            "{DELIMITER}\n{}\n{}\n{DELIMITER}\n",
            self.title, self.publish_date
        );
        out.extend_from_slice(header.as_bytes());
    }

    /// Read exactly the four header lines from `reader`, leaving it
    /// positioned at the first body byte.
    pub fn read_from<R: BufRead>(reader: &mut R) -> std::result::Result<Self, ReadError> {
        let mut lines = HeaderLines::new(reader);

        lines.expect_delimiter("opening delimiter")?;

        let (line, title) = lines.next_line("title")?;
        if title.is_empty() {
            return Err(DocumentError::EmptyTitle { line }.into());
        }
        if title == DELIMITER {
            return Err(DocumentError::TitleIsDelimiter { line }.into());
        }

        let (line, date) = lines.next_line("publish date")?;
        let publish_date = PublishDate::parse(&date)
            .map_err(|source| DocumentError::InvalidDate { line, source })?;

        lines.expect_delimiter("closing delimiter")?;

        Ok(Self {
            title,
            publish_date,
        })
    }
}

/// Failure while reading a header from a stream
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Malformed(#[from] DocumentError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReadError {
    fn for_slug(self, slug: &Slug) -> ArticleError {
        match self {
            Self::Malformed(source) => ArticleError::malformed(slug, source),
            Self::Io(source) => ArticleError::Io { source },
        }
    }
}

/// Line-at-a-time reader that tracks the 1-based line number
struct HeaderLines<'r, R> {
    reader: &'r mut R,
    line: usize,
    buf: Vec<u8>,
}

impl<'r, R: BufRead> HeaderLines<'r, R> {
    fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::with_capacity(128),
        }
    }

    fn next_line(&mut self, expected: &'static str) -> std::result::Result<(usize, String), ReadError> {
        self.line += 1;
        let line = self.line;

        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(DocumentError::MissingLine { line, expected }.into());
        }

        let mut content = self.buf.as_slice();
        if let Some(rest) = content.strip_suffix(b"\n") {
            content = rest;
        }
        if let Some(rest) = content.strip_suffix(b"\r") {
            content = rest;
        }

        let text = std::str::from_utf8(content).map_err(|_| DocumentError::InvalidUtf8 { line })?;
        Ok((line, text.to_owned()))
    }

    fn expect_delimiter(&mut self, expected: &'static str) -> std::result::Result<(), ReadError> {
        let (line, text) = self.next_line(expected)?;
        if text != DELIMITER {
            return Err(DocumentError::ExpectedDelimiter { line }.into());
        }
        Ok(())
    }
}

/// Serialize an article: the four header lines, then the body verbatim.
pub fn encode(article: &Article) -> Vec<u8> {
    let header = Header {
        title: article.title.clone(),
        publish_date: article.publish_date,
    };

    let mut out = Vec::with_capacity(article.title.len() + article.body.len() + 24);
    header.encode_into(&mut out);
    out.extend_from_slice(&article.body);
    out
}

/// Parse a complete article file. Everything after the fourth line is the
/// body, returned unmodified.
pub fn decode(slug: &Slug, bytes: &[u8]) -> Result<Article> {
    let mut rest = bytes;
    let header = Header::read_from(&mut rest).map_err(|err| err.for_slug(slug))?;

    Ok(Article {
        title: header.title,
        slug: slug.clone(),
        publish_date: header.publish_date,
        body: rest.to_vec(),
    })
}

/// Parse only the header from a stream; the body is never read.
pub fn decode_metadata<R: BufRead>(slug: &Slug, mut reader: R) -> Result<ArticleMetadata> {
    let header = Header::read_from(&mut reader).map_err(|err| err.for_slug(slug))?;

    Ok(ArticleMetadata {
        title: header.title,
        slug: slug.clone(),
        publish_date: header.publish_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};

    fn slug() -> Slug {
        Slug::new("hello-world").unwrap()
    }

    fn article(body: &[u8]) -> Article {
        Article::new(
            "Hello World",
            slug(),
            PublishDate::parse("2024-05-01").unwrap(),
            body,
        )
    }

    fn malformed(bytes: &[u8]) -> DocumentError {
        match decode(&slug(), bytes) {
            Err(ArticleError::MalformedDocument { source, .. }) => source,
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&article(b"# Hi\n\nThere"));
        assert_eq!(bytes, b"---\nHello World\n2024-05-01\n---\n# Hi\n\nThere");
    }

    #[test]
    fn test_decode_round_trip() {
        let original = article(b"line one\n---\nline after a rule\n");
        let decoded = decode(&slug(), &encode(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_empty_body() {
        let original = article(b"");
        let decoded = decode(&slug(), &encode(&original)).unwrap();
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn test_body_may_be_binary() {
        let original = article(&[0xff, 0xfe, b'\n', 0x00]);
        let decoded = decode(&slug(), &encode(&original)).unwrap();
        assert_eq!(decoded.body, original.body);
    }

    #[test]
    fn test_closing_delimiter_at_eof() {
        let decoded = decode(&slug(), b"---\nTitle\n2024-05-01\n---").unwrap();
        assert_eq!(decoded.title, "Title");
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn test_crlf_header_is_tolerated() {
        let decoded = decode(&slug(), b"---\r\nTitle\r\n2024-05-01\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(decoded.title, "Title");
        assert_eq!(decoded.body, b"body\r\n");
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let err = malformed(b"---\nTitle\nMay 1st\n---\nbody");
        assert!(matches!(err, DocumentError::InvalidDate { line: 3, .. }));
    }

    #[test]
    fn test_title_equal_to_delimiter_fails_loudly() {
        let err = malformed(b"---\n---\n2024-05-01\n---\nbody");
        assert_eq!(err, DocumentError::TitleIsDelimiter { line: 2 });
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = malformed(b"Title\n2024-05-01\n---\nbody");
        assert_eq!(err, DocumentError::ExpectedDelimiter { line: 1 });
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let err = malformed(b"---\nTitle\n2024-05-01\nbody starts here\n");
        assert_eq!(err, DocumentError::ExpectedDelimiter { line: 4 });
    }

    #[test]
    fn test_truncated_header() {
        let err = malformed(b"---\nTitle\n");
        assert_eq!(
            err,
            DocumentError::MissingLine {
                line: 3,
                expected: "publish date"
            }
        );
        assert_eq!(
            malformed(b""),
            DocumentError::MissingLine {
                line: 1,
                expected: "opening delimiter"
            }
        );
    }

    #[test]
    fn test_empty_title() {
        let err = malformed(b"---\n\n2024-05-01\n---\n");
        assert_eq!(err, DocumentError::EmptyTitle { line: 2 });
    }

    #[test]
    fn test_non_utf8_header() {
        let err = malformed(b"---\n\xff\xfe\n2024-05-01\n---\n");
        assert_eq!(err, DocumentError::InvalidUtf8 { line: 2 });
    }

    #[test]
    fn test_decode_metadata_stops_after_header() {
        let bytes = encode(&article(b"the body that should stay unread"));
        let mut reader = BufReader::new(bytes.as_slice());

        let meta = decode_metadata(&slug(), &mut reader).unwrap();
        assert_eq!(meta, article(b"").metadata());

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"the body that should stay unread");
    }

    #[test]
    fn test_decode_metadata_reports_bad_date() {
        let result = decode_metadata(&slug(), &b"---\nTitle\n2024-99-01\n---\n"[..]);
        match result {
            Err(ArticleError::MalformedDocument { source, .. }) => {
                assert!(matches!(source, DocumentError::InvalidDate { line: 3, .. }));
            }
            other => panic!("expected MalformedDocument, got {other:?}"),
        }
    }
}
