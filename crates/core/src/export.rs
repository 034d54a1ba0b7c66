//! The per-bookmark export loop.
//!
//! For each bookmark in the folder, strictly one after another: scrape it,
//! assemble and render its PDF, write its highlight notes, and optionally
//! archive it. Per-bookmark problems ([`FolioError::is_per_bookmark`]) are
//! recorded and skipped; anything else ends the run.

use std::path::PathBuf;

use crate::assemble::DocumentAssembler;
use crate::bookmark::Bookmark;
use crate::config::ExportConfig;
use crate::highlights::{HighlightExport, export_highlights};
use crate::layout::OutputLayout;
use crate::render::{RenderOutcome, Renderer, create_pdf};
use crate::source::{BookmarkSource, find_folder_id};
use crate::{FolioError, Result};

/// Knobs for [`Exporter`] that are not about where files go.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub folder: String,
    pub limit: u32,
    pub archive: bool,
    pub staging_dir: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { folder: "keep".to_string(), limit: 5, archive: false, staging_dir: None }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            folder: config.folder.clone(),
            limit: config.limit,
            archive: config.archive,
            staging_dir: config.staging_dir.clone(),
        }
    }
}

/// One successfully processed bookmark.
#[derive(Debug, Clone)]
pub struct ExportedArticle {
    pub bookmark_id: u64,
    pub title: String,
    pub pdf_path: PathBuf,
    pub render: RenderOutcome,
    pub highlights: HighlightExport,
    pub archived: bool,
}

impl ExportedArticle {
    pub fn rendered(&self) -> bool {
        self.render.success()
    }
}

/// A bookmark that was skipped.
#[derive(Debug)]
pub struct FailedArticle {
    pub bookmark_id: u64,
    pub title: String,
    pub error: FolioError,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub exported: Vec<ExportedArticle>,
    pub failures: Vec<FailedArticle>,
}

impl ExportReport {
    /// Number of PDFs the renderer reported as written.
    pub fn rendered_count(&self) -> usize {
        self.exported.iter().filter(|a| a.rendered()).count()
    }

    /// Number of note files written.
    pub fn notes_count(&self) -> usize {
        self.exported.iter().filter(|a| a.highlights.written().is_some()).count()
    }
}

/// Drives one export run over a [`BookmarkSource`] and a [`Renderer`].
pub struct Exporter<'a, S, R: ?Sized> {
    source: &'a S,
    renderer: &'a R,
    assembler: DocumentAssembler,
    layout: OutputLayout,
    options: ExportOptions,
}

impl<'a, S: BookmarkSource, R: Renderer + ?Sized> Exporter<'a, S, R> {
    pub fn new(source: &'a S, renderer: &'a R, layout: OutputLayout, options: ExportOptions) -> Self {
        Self { source, renderer, assembler: DocumentAssembler::new(), layout, options }
    }

    /// Exports up to `limit` bookmarks from the configured folder.
    ///
    /// # Errors
    ///
    /// Fails fast on [`FolioError::FolderNotFound`], API/HTTP errors, and
    /// filesystem errors. Structural problems with a single article are
    /// reported in [`ExportReport::failures`] instead.
    pub async fn run(&self) -> Result<ExportReport> {
        let folder_id = find_folder_id(self.source, &self.options.folder).await?;
        let bookmarks = self.source.bookmarks(&folder_id, self.options.limit).await?;
        tracing::info!(folder = %self.options.folder, count = bookmarks.len(), "exporting bookmarks");

        let mut report = ExportReport::default();
        for bookmark in bookmarks {
            let (id, title) = (bookmark.id, bookmark.title.clone());
            match self.export_bookmark(bookmark).await {
                Ok(article) => report.exported.push(article),
                Err(error) if error.is_per_bookmark() => {
                    tracing::warn!(bookmark_id = id, title = %title, %error, "skipping bookmark");
                    report.failures.push(FailedArticle { bookmark_id: id, title, error });
                }
                Err(error) => {
                    tracing::error!(bookmark_id = id, title = %title, %error, "export aborted");
                    return Err(error);
                }
            }
        }

        tracing::info!(
            exported = report.exported.len(),
            failed = report.failures.len(),
            pdf_root = %self.layout.pdf_root.display(),
            "export finished"
        );
        Ok(report)
    }

    /// Scrapes, renders, and writes notes for one bookmark.
    ///
    /// Notes are written even when the renderer reported a failure; they
    /// point at the path the PDF was meant to have.
    pub async fn export_bookmark(&self, mut bookmark: Bookmark) -> Result<ExportedArticle> {
        tracing::info!(bookmark_id = bookmark.id, title = %bookmark.title, "processing");

        self.source.scrape(&mut bookmark).await?;
        let (pdf_path, render) = self.render(&bookmark)?;

        let highlights = self.source.highlights(&bookmark).await?;
        let highlights = export_highlights(&bookmark, &highlights, &pdf_path, &self.layout)?;

        // A bookmark whose PDF did not render stays put so the next run retries it.
        let archived = if self.options.archive && render.success() {
            self.source.archive(&bookmark).await?;
            tracing::debug!(bookmark_id = bookmark.id, "archived");
            true
        } else {
            false
        };

        Ok(ExportedArticle { bookmark_id: bookmark.id, title: bookmark.title, pdf_path, render, highlights, archived })
    }

    fn render(&self, bookmark: &Bookmark) -> Result<(PathBuf, RenderOutcome)> {
        let document = self.assembler.assemble(bookmark)?;
        let pdf_path = self.layout.pdf_path(bookmark)?;

        let rendered = create_pdf(&document, &pdf_path, self.renderer, self.options.staging_dir.as_deref())?;
        if !rendered.outcome.success() {
            tracing::warn!(
                pdf = %rendered.path.display(),
                exit_code = ?rendered.outcome.exit_code,
                stderr = %rendered.outcome.stderr.trim(),
                "renderer reported failure"
            );
        }

        Ok((rendered.path, rendered.outcome))
    }
}

/// Logs in with the configured credentials and exports with [`CommandRenderer`].
///
/// [`CommandRenderer`]: crate::render::CommandRenderer
#[cfg(feature = "fetch")]
pub async fn run_export(config: &ExportConfig) -> Result<ExportReport> {
    use crate::render::CommandRenderer;
    use crate::source::{Credentials, InstapaperClient};

    config.validate()?;
    let client = InstapaperClient::login_at(&config.api_url, &Credentials::from(config), config.timeout).await?;
    let renderer = CommandRenderer::new(&config.renderer);

    Exporter::new(&client, &renderer, config.layout(), ExportOptions::from(config))
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::bookmark::{Folder, Highlight};

    #[derive(Default)]
    struct FakeSource {
        folders: Vec<Folder>,
        bookmarks: Vec<(Bookmark, String, Vec<Highlight>)>,
        archived: RefCell<Vec<u64>>,
    }

    impl BookmarkSource for FakeSource {
        async fn folders(&self) -> Result<Vec<Folder>> {
            Ok(self.folders.clone())
        }

        async fn bookmarks(&self, _folder_id: &str, limit: u32) -> Result<Vec<Bookmark>> {
            Ok(self.bookmarks.iter().take(limit as usize).map(|(b, _, _)| b.clone()).collect())
        }

        async fn scrape(&self, bookmark: &mut Bookmark) -> Result<()> {
            let (_, text, _) = self.bookmarks.iter().find(|(b, _, _)| b.id == bookmark.id).unwrap();
            bookmark.text = Some(text.clone());
            Ok(())
        }

        async fn highlights(&self, bookmark: &Bookmark) -> Result<Vec<Highlight>> {
            Ok(self.bookmarks.iter().find(|(b, _, _)| b.id == bookmark.id).unwrap().2.clone())
        }

        async fn archive(&self, bookmark: &Bookmark) -> Result<()> {
            self.archived.borrow_mut().push(bookmark.id);
            Ok(())
        }
    }

    struct NoopRenderer;

    impl Renderer for NoopRenderer {
        fn render(&self, _markup: &Path, _output: &Path) -> Result<RenderOutcome> {
            Ok(RenderOutcome::ok())
        }
    }

    fn source() -> FakeSource {
        FakeSource {
            folders: vec![Folder { folder_id: "11".into(), title: "keep".into() }],
            bookmarks: vec![
                (
                    Bookmark::new(1, "First", "https://example.com/1", 1_678_881_600),
                    "<p>one</p>".into(),
                    vec![Highlight::new("h")],
                ),
                (
                    Bookmark::new(2, "Frames", "https://example.com/2", 1_678_881_600),
                    "<frameset><frame src=\"x\"></frameset>".into(),
                    vec![],
                ),
                (Bookmark::new(3, "Third", "https://example.com/3", 1_678_881_600), "<p>three</p>".into(), vec![]),
            ],
            archived: RefCell::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_structural_failure_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let source = source();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));
        let options = ExportOptions { staging_dir: Some(tmp.path().to_path_buf()), ..Default::default() };

        let report = Exporter::new(&source, &NoopRenderer, layout, options).run().await.unwrap();

        let ids: Vec<u64> = report.exported.iter().map(|a| a.bookmark_id).collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].bookmark_id, 2);
        assert!(matches!(report.failures[0].error, FolioError::Structural(_)));
        assert_eq!(report.notes_count(), 1);
        assert_eq!(report.rendered_count(), 2);
        assert!(source.archived.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_archive_after_export() {
        let tmp = TempDir::new().unwrap();
        let source = source();
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));
        let options = ExportOptions { archive: true, limit: 1, ..Default::default() };

        let report = Exporter::new(&source, &NoopRenderer, layout, options).run().await.unwrap();

        assert_eq!(report.exported.len(), 1);
        assert!(report.exported[0].archived);
        assert_eq!(*source.archived.borrow(), [1]);
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let mut source = source();
        source.bookmarks[0].0.time = i64::MAX;
        let layout = OutputLayout::new(tmp.path().join("pdf"), tmp.path().join("notes"));

        let report = Exporter::new(&source, &NoopRenderer, layout, ExportOptions::default()).run().await.unwrap();

        assert!(matches!(report.failures[0].error, FolioError::InvalidTimestamp(i64::MAX)));
        assert_eq!(report.failures[0].bookmark_id, 1);
        let ids: Vec<u64> = report.exported.iter().map(|a| a.bookmark_id).collect();
        assert_eq!(ids, [3]);
    }

    #[tokio::test]
    async fn test_unknown_folder_aborts() {
        let source = source();
        let layout = OutputLayout::new("/unused/pdf", "/unused/notes");
        let options = ExportOptions { folder: "missing".into(), ..Default::default() };

        let err = Exporter::new(&source, &NoopRenderer, layout, options).run().await.unwrap_err();
        assert!(matches!(err, FolioError::FolderNotFound(ref name) if name == "missing"));
    }
}
