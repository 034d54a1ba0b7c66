//! Lenient HTML parsing and structure checks.
//!
//! This module provides the [`Document`] and [`Element`] types. Parsing goes
//! through html5ever's error-recovering tree builder (via `scraper`), so
//! missing doctypes, unclosed tags, and bare fragments all produce a tree.
//! What recovery cannot guarantee is the conventional `<html>` root with a
//! `<head>` followed by a `<body>`; [`Document::check_structure`] enforces it.
//!
//! # Example
//!
//! ```rust
//! use folio_core::parse::Document;
//!
//! let doc = Document::parse("<p>unclosed <b>bold").unwrap();
//! doc.check_structure().unwrap();
//! assert_eq!(doc.select("b").unwrap()[0].text(), "bold");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{FolioError, Result};

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup, recovering from malformed input.
    pub fn parse(markup: &str) -> Result<Self> {
        let html = Html::parse_document(markup);
        Ok(Self { html })
    }

    /// Serializes the whole document back to markup.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// The `<head>` element, if the root has the expected shape.
    pub fn head(&self) -> Result<Element<'_>> {
        let (head, _) = self.head_and_body()?;
        Ok(head)
    }

    /// The `<body>` element, if the root has the expected shape.
    pub fn body(&self) -> Result<Element<'_>> {
        let (_, body) = self.head_and_body()?;
        Ok(body)
    }

    /// Verifies the root is `<html>` with exactly `<head>` then `<body>`.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Structural`] otherwise, e.g. for a frameset page.
    pub fn check_structure(&self) -> Result<()> {
        self.head_and_body().map(|_| ())
    }

    fn head_and_body(&self) -> Result<(Element<'_>, Element<'_>)> {
        let root = self.html.root_element();
        if root.value().name() != "html" {
            return Err(FolioError::Structural(format!(
                "expected <html> root, found <{}>",
                root.value().name()
            )));
        }

        let children: Vec<ElementRef<'_>> = root.children().filter_map(ElementRef::wrap).collect();
        let names: Vec<&str> = children.iter().map(|el| el.value().name()).collect();

        match children.as_slice() {
            [head, body] if names == ["head", "body"] => Ok((Element { element: *head }, Element { element: *body })),
            _ => Err(FolioError::Structural(format!(
                "expected <head> and <body> under <html>, found [{}]",
                names.join(", ")
            ))),
        }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Structural`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }
}

/// A wrapper around scraper's `ElementRef`.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// The very first child node, if it is an element.
    ///
    /// Text and comment nodes count as children, so a leading whitespace
    /// node yields `None`.
    pub fn first_child_element(&self) -> Option<Element<'a>> {
        self.element
            .first_child()
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> Vec<Element<'a>> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
            .collect()
    }
}

/// Re-serializes a markup fragment with every open element closed.
///
/// Stray end tags are dropped and document-level tags (`<html>`, `<body>`)
/// are discarded, so the result can be nested inside another element
/// without closing it early or capturing what follows.
pub fn balance_fragment(markup: &str) -> String {
    Html::parse_fragment(markup).root_element().inner_html()
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FolioError::Structural(format!("Invalid selector: {}", e)))
}
