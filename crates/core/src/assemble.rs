//! Article document assembly.
//!
//! Turns a bookmark's scraped markup into a self-contained document ready
//! for rendering: a fixed stylesheet becomes the first child of `<head>`, and
//! a front-matter block (title, source URL, origin line) becomes the first
//! child of `<body>`. The original article content follows untouched.
//!
//! The scraped markup is recovery-parsed and re-serialized before injection,
//! so the rewriter always sees exactly one `<head>` and one `<body>`. The
//! front matter is balanced the same way, so an unclosed tag in the origin
//! line cannot capture or rewrap the article. The injected result is parsed
//! once more to confirm both blocks landed where they belong and that the
//! original body elements follow in their original order.

use std::cell::Cell;

use lol_html::html_content::ContentType;

use crate::bookmark::Bookmark;
use crate::parse::{Document, Element, balance_fragment};
use crate::{FolioError, Result};

/// Typography applied to every rendered article.
pub const STYLESHEET: &str = "<style>body {font-family: Verdana;font-size: 11pt;}</style>";

/// Class carried by the injected front-matter block.
pub const FRONT_MATTER_CLASS: &str = "front-matter";

/// A complete article document.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    markup: String,
}

impl AssembledDocument {
    /// The serialized markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Builds renderable documents from scraped bookmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assembles the document for a scraped bookmark.
    ///
    /// # Errors
    ///
    /// - [`FolioError::MissingContent`] if the bookmark was never scraped.
    /// - [`FolioError::Structural`] if the parsed markup has no `<head>` then
    ///   `<body>` pair under `<html>`, or if injection did not land at the
    ///   first-child positions.
    pub fn assemble(&self, bookmark: &Bookmark) -> Result<AssembledDocument> {
        let text = bookmark.text.as_deref().ok_or(FolioError::MissingContent { id: bookmark.id })?;
        let front_matter = front_matter_fragment(&bookmark.title, &bookmark.url, &bookmark.origin);
        self.assemble_markup(text, &front_matter)
    }

    /// Injects the stylesheet and a prepared front-matter fragment into `markup`.
    ///
    /// The fragment is balanced before injection; it should be a single
    /// front-matter `<div>` such as [`front_matter_fragment`] builds.
    pub fn assemble_markup(&self, markup: &str, front_matter: &str) -> Result<AssembledDocument> {
        let parsed = Document::parse(markup)?;
        parsed.check_structure()?;
        let body_before = tag_names(&parsed.body()?.child_elements());

        let front_matter = balance_fragment(front_matter);
        let injected = inject(&parsed.as_string(), STYLESHEET, &front_matter)?;

        let assembled = Document::parse(&injected)?;
        verify_injection(&assembled, &body_before)?;

        Ok(AssembledDocument { markup: assembled.as_string() })
    }
}

/// Builds the front-matter block.
///
/// Title and URL are escaped. The origin fragment is markup and is not
/// escaped, but it is balanced so that it stays inside the block.
pub fn front_matter_fragment(title: &str, url: &str, origin: &str) -> String {
    format!(
        "<div class=\"{}\"><h1>{}</h1><p>{}</p>{}</div>",
        FRONT_MATTER_CLASS,
        escape_html(title),
        escape_html(url),
        balance_fragment(origin).trim_end()
    )
}

/// Escapes the characters that are special in markup text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Prepends `stylesheet` to `<head>` and `front_matter` to `<body>`.
fn inject(html: &str, stylesheet: &str, front_matter: &str) -> Result<String> {
    let head_done = Cell::new(false);
    let body_done = Cell::new(false);

    let mut output = Vec::with_capacity(html.len() + stylesheet.len() + front_matter.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("head", |el| {
                    if !head_done.replace(true) {
                        el.prepend(stylesheet, ContentType::Html);
                    }
                    Ok(())
                }),
                lol_html::element!("body", |el| {
                    if !body_done.replace(true) {
                        el.prepend(front_matter, ContentType::Html);
                    }
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            output.extend_from_slice(c);
        },
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| FolioError::Structural(format!("rewrite failed: {}", e)))?;
    rewriter
        .end()
        .map_err(|e| FolioError::Structural(format!("rewrite failed: {}", e)))?;

    if !head_done.get() || !body_done.get() {
        return Err(FolioError::Structural("document has no <head> or <body> to inject into".to_string()));
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn tag_names(elements: &[Element<'_>]) -> Vec<String> {
    elements.iter().map(|el| el.tag_name()).collect()
}

fn verify_injection(doc: &Document, body_before: &[String]) -> Result<()> {
    let head_first = doc.head()?.first_child_element().map(|el| el.tag_name());
    if head_first.as_deref() != Some("style") {
        return Err(FolioError::Structural("stylesheet is not the first child of <head>".to_string()));
    }

    let body_first = doc.body()?.first_child_element();
    let is_front_matter = body_first
        .filter(|el| el.tag_name() == "div")
        .and_then(|el| el.attr("class"))
        .is_some_and(|class| class == FRONT_MATTER_CLASS);
    if !is_front_matter {
        return Err(FolioError::Structural("front matter is not the first child of <body>".to_string()));
    }

    let body_after = doc.body()?.child_elements();
    if tag_names(&body_after[1..]) != body_before {
        return Err(FolioError::Structural("front matter displaced the article body".to_string()));
    }

    Ok(())
}
