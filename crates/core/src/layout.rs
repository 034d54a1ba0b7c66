//! Output locations for PDFs and note files.
//!
//! ```text
//! <pdf_root>/<year>/<month>/<title>.pdf
//! <notes_root>/NOTES - <title>.md
//! ```
//!
//! Months are not zero-padded: March 2023 lands in `2023/3`. Dates are
//! computed in the local timezone, so an article saved late on 31 March in
//! New York files under March even though it is already April in UTC.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, TimeZone};

use crate::bookmark::Bookmark;
use crate::{FolioError, Result};

/// Root directories for exported artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub pdf_root: PathBuf,
    pub notes_root: PathBuf,
}

impl OutputLayout {
    pub fn new(pdf_root: impl Into<PathBuf>, notes_root: impl Into<PathBuf>) -> Self {
        Self { pdf_root: pdf_root.into(), notes_root: notes_root.into() }
    }

    /// `<pdf_root>/<year>/<month>` for a creation timestamp.
    pub fn pdf_dir(&self, timestamp: i64) -> Result<PathBuf> {
        let (year, month) = year_month(timestamp)?;
        Ok(self.pdf_root.join(year.to_string()).join(month.to_string()))
    }

    /// Full PDF path for a bookmark. Does not touch the filesystem.
    pub fn pdf_path(&self, bookmark: &Bookmark) -> Result<PathBuf> {
        Ok(self.pdf_dir(bookmark.time)?.join(format!("{}.pdf", bookmark.file_stem())))
    }

    /// Full notes path for a bookmark. Does not touch the filesystem.
    pub fn notes_path(&self, bookmark: &Bookmark) -> PathBuf {
        self.notes_root.join(format!("NOTES - {}.md", bookmark.file_stem()))
    }
}

/// Calendar year and month (1-12) of a Unix timestamp, in local time.
pub fn year_month(timestamp: i64) -> Result<(i32, u8)> {
    year_month_in(timestamp, &Local)
}

/// Calendar year and month (1-12) of a Unix timestamp in `tz`.
pub fn year_month_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Result<(i32, u8)> {
    let date = tz
        .timestamp_opt(timestamp, 0)
        .earliest()
        .ok_or(FolioError::InvalidTimestamp(timestamp))?;
    let month = u8::try_from(date.month()).map_err(|_| FolioError::InvalidTimestamp(timestamp))?;
    Ok((date.year(), month))
}

/// Creates `dir` and any missing parents. An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Creates the parent directory of `file`, if it has one.
pub fn ensure_parent(file: &Path) -> Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
