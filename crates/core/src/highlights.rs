//! Highlight note files.
//!
//! Each bookmark with highlights gets a `NOTES - <title>.md` file that links
//! back to the article and its rendered PDF:
//!
//! ```text
//! URL: https://example.com/article
//! File: file:///exports/pdf/2023/3/Article.pdf
//!
//! * first highlighted passage
//!     NOTE: my annotation
//!
//! * second highlighted passage
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::bookmark::{Bookmark, Highlight};
use crate::layout::{OutputLayout, ensure_dir};

/// What [`export_highlights`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightExport {
    /// The bookmark had no highlights; nothing touched the filesystem.
    NothingWritten,
    /// The note file that was written.
    Written(PathBuf),
}

impl HighlightExport {
    pub fn written(&self) -> Option<&Path> {
        match self {
            HighlightExport::Written(path) => Some(path),
            HighlightExport::NothingWritten => None,
        }
    }
}

/// Renders the note file contents.
pub fn format_notes(url: &str, pdf_path: &Path, highlights: &[Highlight]) -> String {
    let mut out = format!("URL: {}\nFile: file://{}", url, pdf_path.display());

    for highlight in highlights {
        out.push_str(&format!("\n\n* {}", highlight.text));
        if let Some(note) = highlight.note() {
            out.push_str(&format!("\n    NOTE: {}", note));
        }
    }

    out
}

/// Writes the note file for `bookmark`, overwriting any previous one.
///
/// The PDF reference is made absolute against the current directory when
/// `pdf_path` is relative.
pub fn export_highlights(
    bookmark: &Bookmark, highlights: &[Highlight], pdf_path: &Path, layout: &OutputLayout,
) -> Result<HighlightExport> {
    if highlights.is_empty() {
        return Ok(HighlightExport::NothingWritten);
    }

    ensure_dir(&layout.notes_root)?;

    let pdf_path = std::path::absolute(pdf_path)?;
    let notes_path = layout.notes_path(bookmark);
    fs::write(&notes_path, format_notes(&bookmark.url, &pdf_path, highlights))?;

    tracing::debug!(notes = %notes_path.display(), count = highlights.len(), "wrote highlight notes");
    Ok(HighlightExport::Written(notes_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bookmark() -> Bookmark {
        Bookmark::new(3, "Deep Work", "https://example.com/deep-work", 1_678_881_600)
    }

    #[test]
    fn test_format_notes() {
        let highlights = vec![
            Highlight::new("Focus is a skill.").with_note("Train it daily"),
            Highlight::new("Shallow work is noisy."),
        ];
        let notes = format_notes("https://example.com/deep-work", Path::new("/pdf/2023/3/Deep Work.pdf"), &highlights);

        assert_eq!(
            notes,
            "URL: https://example.com/deep-work\n\
             File: file:///pdf/2023/3/Deep Work.pdf\n\
             \n\
             * Focus is a skill.\n    NOTE: Train it daily\n\
             \n\
             * Shallow work is noisy."
        );
    }

    #[test]
    fn test_no_highlights_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));

        let result = export_highlights(&bookmark(), &[], Path::new("/pdf/x.pdf"), &layout).unwrap();

        assert_eq!(result, HighlightExport::NothingWritten);
        assert!(result.written().is_none());
        assert!(!layout.notes_root.exists());
    }

    #[test]
    fn test_whitespace_note_is_written() {
        let notes = format_notes("u", Path::new("/p.pdf"), &[Highlight::new("a").with_note(" "), Highlight::new("b").with_note("")]);
        assert_eq!(notes, "URL: u\nFile: file:///p.pdf\n\n* a\n    NOTE:  \n\n* b");
    }

    #[test]
    fn test_two_highlights_one_note() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));
        let pdf = tmp.path().join("pdf").join("2023").join("3").join("Deep Work.pdf");
        let highlights = vec![Highlight::new("first").with_note("why it matters"), Highlight::new("second")];

        let result = export_highlights(&bookmark(), &highlights, &pdf, &layout).unwrap();

        let path = result.written().unwrap();
        assert_eq!(path, layout.notes_root.join("NOTES - Deep Work.md"));
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text.matches("\n* ").count(), 2);
        assert_eq!(text.matches("NOTE:").count(), 1);
        assert!(text.contains("* first\n    NOTE: why it matters"));
        assert!(text.ends_with("* second"));
        assert!(text.contains(&format!("File: file://{}", pdf.display())));
    }

    #[test]
    fn test_unicode_and_overwrite() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));
        let pdf = tmp.path().join("a.pdf");

        export_highlights(&bookmark(), &[Highlight::new("old")], &pdf, &layout).unwrap();
        let result = export_highlights(&bookmark(), &[Highlight::new("naïve — 日本語 ✓")], &pdf, &layout).unwrap();

        let text = fs::read_to_string(result.written().unwrap()).unwrap();
        assert!(text.contains("* naïve — 日本語 ✓"));
        assert!(!text.contains("* old"));
    }

    #[test]
    fn test_relative_pdf_path_is_made_absolute() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));

        let result = export_highlights(&bookmark(), &[Highlight::new("x")], Path::new("pdf/a.pdf"), &layout).unwrap();

        let text = fs::read_to_string(result.written().unwrap()).unwrap();
        let expected = std::env::current_dir().unwrap().join("pdf/a.pdf");
        assert!(text.contains(&format!("File: file://{}", expected.display())));
    }
}
