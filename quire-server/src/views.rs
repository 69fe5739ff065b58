//! HTML views
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars escapes every `{{value}}`; only the rendered markdown body
//! is inserted raw with `{{{body_html}}}`.

use handlebars::{Handlebars, RenderError, TemplateError};
use quire_core::{Article, ArticleDraft, ArticleMetadata, PublishDate, Slug, ValidationError};
use serde::Serialize;
use thiserror::Error;

const LAYOUT: &str = include_str!("../templates/layout.hbs");
const LIST: &str = include_str!("../templates/list.hbs");
const ARTICLE: &str = include_str!("../templates/article.hbs");
const EDIT: &str = include_str!("../templates/edit.hbs");

/// Template registration or rendering failure
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to compile template: {0}")]
    Template(#[from] Box<TemplateError>),

    #[error("failed to render template: {0}")]
    Render(#[from] RenderError),
}

impl From<TemplateError> for ViewError {
    fn from(err: TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

/// Compiled page templates
pub struct Views {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views").finish_non_exhaustive()
    }
}

impl Views {
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", LAYOUT)?;
        registry.register_template_string("list", LIST)?;
        registry.register_template_string("article", ARTICLE)?;
        registry.register_template_string("edit", EDIT)?;
        Ok(Self { registry })
    }

    pub fn render_list(&self, page: &ListPage<'_>) -> Result<String, ViewError> {
        self.render("list", page)
    }

    pub fn render_article(&self, page: &ArticlePage<'_>) -> Result<String, ViewError> {
        self.render("article", page)
    }

    pub fn render_edit(&self, page: &EditPage) -> Result<String, ViewError> {
        self.render("edit", page)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, ViewError> {
        Ok(self.registry.render(name, data)?)
    }
}

/// Article index, public or admin
#[derive(Debug, Serialize)]
pub struct ListPage<'a> {
    pub title: &'static str,
    pub admin: bool,
    pub articles: Vec<ListEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ListEntry<'a> {
    #[serde(flatten)]
    pub article: &'a ArticleMetadata,
    pub published: bool,
}

impl<'a> ListPage<'a> {
    pub fn public(articles: &'a [ArticleMetadata], today: PublishDate) -> Self {
        Self::build("Articles", false, articles, today)
    }

    pub fn admin(articles: &'a [ArticleMetadata], today: PublishDate) -> Self {
        Self::build("All articles", true, articles, today)
    }

    fn build(
        title: &'static str,
        admin: bool,
        articles: &'a [ArticleMetadata],
        today: PublishDate,
    ) -> Self {
        let articles = articles
            .iter()
            .map(|article| ListEntry {
                article,
                published: article.is_public(today),
            })
            .collect();

        Self {
            title,
            admin,
            articles,
        }
    }
}

/// A single rendered article
#[derive(Debug, Serialize)]
pub struct ArticlePage<'a> {
    pub title: &'a str,
    pub slug: &'a Slug,
    pub publish_date: PublishDate,
    pub body_html: &'a str,
}

impl<'a> ArticlePage<'a> {
    pub fn new(article: &'a Article, body_html: &'a str) -> Self {
        Self {
            title: &article.title,
            slug: &article.slug,
            publish_date: article.publish_date,
            body_html,
        }
    }
}

/// Create/edit form
#[derive(Debug, Serialize)]
pub struct EditPage {
    pub title: String,
    pub slug: Option<String>,
    pub publish_date: String,
    pub body: String,
    /// Where the form posts to
    pub action: String,
    /// Whether a stored article backs this form (enables delete)
    pub exists: bool,
    pub error: Option<String>,
    pub admin: bool,
}

impl EditPage {
    /// Blank create form, optionally prefilled with a title.
    pub fn create(title: &str, today: PublishDate) -> Self {
        Self {
            title: title.to_owned(),
            slug: None,
            publish_date: today.to_string(),
            body: String::new(),
            action: create_action(),
            exists: false,
            error: None,
            admin: true,
        }
    }

    pub fn for_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            slug: Some(article.slug.to_string()),
            publish_date: article.publish_date.to_string(),
            body: String::from_utf8_lossy(&article.body).into_owned(),
            action: edit_action(&article.slug),
            exists: true,
            error: None,
            admin: true,
        }
    }

    /// Form for a slug with no article yet. It posts to the create route,
    /// so the stored slug is derived from the submitted title.
    pub fn fallback(slug: &Slug, today: PublishDate) -> Self {
        Self {
            title: slug.to_string(),
            slug: None,
            publish_date: today.to_string(),
            body: String::new(),
            action: create_action(),
            exists: false,
            error: None,
            admin: true,
        }
    }

    /// Re-display submitted values, e.g. after a validation failure.
    pub fn from_draft(draft: &ArticleDraft, slug: Option<&Slug>, exists: bool) -> Self {
        Self {
            title: draft.title.clone(),
            slug: slug.map(Slug::to_string),
            publish_date: draft.publish_date.clone().unwrap_or_default(),
            body: draft.body.clone(),
            action: slug.map_or_else(create_action, edit_action),
            exists,
            error: None,
            admin: true,
        }
    }

    pub fn with_error(mut self, err: &ValidationError) -> Self {
        self.error = Some(err.to_string());
        self
    }
}

fn create_action() -> String {
    "/admin/articles".to_owned()
}

fn edit_action(slug: &Slug) -> String {
    format!("/admin/articles/{slug}?action=edit")
}
