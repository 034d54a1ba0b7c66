//! Bookmark, highlight, and folder records.
//!
//! These mirror the objects returned by the Instapaper API. A [`Bookmark`]
//! arrives without its article body; [`crate::BookmarkSource::scrape`] fills
//! in `text` and `origin` before the bookmark is assembled into a document.

use serde::Deserialize;

/// A saved article.
#[derive(Debug, Clone, Deserialize)]
pub struct Bookmark {
    /// Instapaper bookmark id.
    #[serde(rename = "bookmark_id")]
    pub id: u64,
    pub title: String,
    pub url: String,
    /// Creation time in seconds since the Unix epoch.
    pub time: i64,
    /// Scraped article markup, populated lazily.
    #[serde(skip)]
    pub text: Option<String>,
    /// Trusted markup fragment describing the article's source and byline.
    #[serde(skip)]
    pub origin: String,
}

impl Bookmark {
    /// Creates a bookmark that has not been scraped yet.
    pub fn new(id: u64, title: impl Into<String>, url: impl Into<String>, time: i64) -> Self {
        Self { id, title: title.into(), url: url.into(), time, text: None, origin: String::new() }
    }

    /// Attaches scraped markup and an origin fragment.
    pub fn with_content(mut self, text: impl Into<String>, origin: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.origin = origin.into();
        self
    }

    /// File name stem derived from the title.
    ///
    /// Path separators and NUL cannot appear in a file name, so they become
    /// `-`. A title that is blank after trimming falls back to `bookmark-<id>`.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
            .collect();
        let stem = stem.trim();

        if stem.is_empty() { format!("bookmark-{}", self.id) } else { stem.to_string() }
    }
}

/// A user-selected passage with an optional annotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Highlight {
    pub text: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl Highlight {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The annotation, if present and non-empty. Whitespace counts as content.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// A named collection of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "folder_id_string")]
    pub folder_id: String,
    pub title: String,
}

/// Folders every account has; they never show up in the folder listing.
pub const BUILTIN_FOLDERS: &[&str] = &["unread", "starred", "archive"];

fn folder_id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}
