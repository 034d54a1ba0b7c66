//! Where bookmarks come from.
//!
//! [`BookmarkSource`] is the seam between the export pipeline and the
//! read-it-later service. [`InstapaperClient`] is the real implementation;
//! tests substitute an in-memory source.

#[cfg(feature = "fetch")]
pub mod instapaper;
#[cfg(feature = "fetch")]
pub mod oauth;

use crate::bookmark::{BUILTIN_FOLDERS, Bookmark, Folder, Highlight};
use crate::{FolioError, Result};

#[cfg(feature = "fetch")]
pub use instapaper::{Credentials, InstapaperClient};

/// A read-it-later service.
///
/// Calls are awaited one at a time; implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait BookmarkSource {
    /// User-created folders. Builtin folders are not included.
    async fn folders(&self) -> Result<Vec<Folder>>;

    /// Up to `limit` bookmarks in `folder_id`, most recent first.
    async fn bookmarks(&self, folder_id: &str, limit: u32) -> Result<Vec<Bookmark>>;

    /// Fills in the bookmark's scraped `text` and `origin` line.
    async fn scrape(&self, bookmark: &mut Bookmark) -> Result<()>;

    /// Highlights on the bookmark, in the order the service returns them.
    async fn highlights(&self, bookmark: &Bookmark) -> Result<Vec<Highlight>>;

    /// Moves the bookmark to the archive.
    async fn archive(&self, bookmark: &Bookmark) -> Result<()>;
}

/// Resolves a folder name to the id the bookmark listing expects.
///
/// Builtin folders (`unread`, `starred`, `archive`) resolve to their own name
/// without a listing call.
///
/// # Errors
///
/// Returns [`FolioError::FolderNotFound`] when no folder has that title.
pub async fn find_folder_id<S: BookmarkSource>(source: &S, name: &str) -> Result<String> {
    if BUILTIN_FOLDERS.contains(&name) {
        return Ok(name.to_string());
    }

    source
        .folders()
        .await?
        .into_iter()
        .find(|folder| folder.title == name)
        .map(|folder| folder.folder_id)
        .ok_or_else(|| FolioError::FolderNotFound(name.to_string()))
}
