//! Article management commands: new, list, show, delete
//!
//! These work directly on the store directory, so they are safe to run while
//! a server is serving the same directory.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use quire_core::{
    listing, visibility, ArticleDraft, ArticleStore, Clock, MarkdownRenderer, Slug, SystemClock,
};

use crate::config::QuireConfig;

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Article title; the slug is derived from it
    pub title: String,

    /// Publish date (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Read the markdown body from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// Replace an existing article with the same slug
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Include articles scheduled for a future date
    #[arg(long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Slug of the article
    pub slug: String,

    /// Print rendered HTML instead of the raw markdown body
    #[arg(long)]
    pub html: bool,

    /// Ignore the publish date (show scheduled articles too)
    #[arg(long)]
    pub admin: bool,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Slug of the article
    pub slug: String,
}

fn open_store(config: &QuireConfig) -> Result<ArticleStore> {
    ArticleStore::open(&config.data_dir).with_context(|| {
        format!("Failed to open article directory {}", config.data_dir.display())
    })
}

fn parse_slug(raw: &str) -> Result<Slug> {
    Slug::new(raw).with_context(|| format!("Invalid slug '{raw}'"))
}

fn read_body(path: Option<PathBuf>) -> Result<String> {
    match path {
        None => Ok(String::new()),
        Some(path) if path.as_os_str() == "-" => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read body from stdin")?;
            Ok(body)
        }
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read body file {}", path.display())),
    }
}

/// Create an article and print its slug
pub fn run_new(args: NewArgs, config: &QuireConfig) -> Result<()> {
    let store = open_store(config)?;
    let body = read_body(args.body_file)?;

    let mut draft = ArticleDraft::new(args.title, body);
    if let Some(date) = args.date {
        draft = draft.with_publish_date(date);
    }
    let article = draft
        .into_new_article(SystemClock.today())
        .context("Invalid article")?;

    if !args.force && store.exists(&article.slug)? {
        bail!(
            "Article '{}' already exists (use --force to replace it)",
            article.slug
        );
    }

    store.save(&article)?;
    tracing::info!(slug = %article.slug, date = %article.publish_date, "article created");
    println!("{}", article.slug);
    Ok(())
}

/// Print `date  slug  title` lines, newest first
pub fn run_list(args: ListArgs, config: &QuireConfig) -> Result<()> {
    let store = open_store(config)?;

    let mut articles = if args.all {
        listing::list_all(&store)?
    } else {
        listing::list_published(&store, SystemClock.today())?
    };
    listing::sort_newest_first(&mut articles);

    let mut out = io::stdout().lock();
    for article in &articles {
        writeln!(
            out,
            "{}  {}  {}",
            article.publish_date, article.slug, article.title
        )?;
    }
    Ok(())
}

/// Print one article's body, raw or rendered
pub fn run_show(args: ShowArgs, config: &QuireConfig) -> Result<()> {
    let store = open_store(config)?;
    let slug = parse_slug(&args.slug)?;

    let article = if args.admin {
        store.load(&slug)?
    } else {
        visibility::fetch_published(&store, &slug, SystemClock.today())?
    };

    let mut out = io::stdout().lock();
    if args.html {
        let html = MarkdownRenderer::new(config.render_options()).render(&article.body)?;
        out.write_all(html.as_bytes())?;
    } else {
        out.write_all(&article.body)?;
    }
    out.flush()?;
    Ok(())
}

pub fn run_delete(args: DeleteArgs, config: &QuireConfig) -> Result<()> {
    let store = open_store(config)?;
    let slug = parse_slug(&args.slug)?;

    store.delete(&slug)?;
    tracing::info!(%slug, "article deleted");
    println!("Deleted {slug}");
    Ok(())
}
