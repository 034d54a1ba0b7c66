//! PDF rendering through an external program.
//!
//! [`create_pdf`] stages an assembled document as an `.html` file, hands it
//! to a [`Renderer`], and removes the staged file again whether or not the
//! renderer succeeded. The default renderer is [`CommandRenderer`], which runs
//! `wkhtmltopdf <input.html> <output.pdf>` and waits for it to exit.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::{NamedTempFile, TempPath};

use crate::assemble::AssembledDocument;
use crate::layout::ensure_parent;
use crate::{FolioError, Result};

/// Renderer used when none is configured.
pub const DEFAULT_RENDERER: &str = "wkhtmltopdf";

/// What the renderer reported. Never interpreted as an error by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RenderOutcome {
    /// A clean exit with no output, handy for test doubles.
    pub fn ok() -> Self {
        Self { exit_code: Some(0), ..Default::default() }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Turns a markup file into a PDF file.
pub trait Renderer {
    /// Renders `markup` into `output`, blocking until done.
    ///
    /// Implementations report a renderer that ran but failed through the
    /// returned [`RenderOutcome`]; `Err` is for failing to run at all.
    fn render(&self, markup: &Path, output: &Path) -> Result<RenderOutcome>;
}

/// Runs an external program with the markup and output paths as arguments.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: OsString,
    args: Vec<OsString>,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl CommandRenderer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    /// Extra arguments placed before the two paths (e.g. `--quiet`).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, markup: &Path, output: &Path) -> Result<RenderOutcome> {
        tracing::debug!(program = ?self.program, markup = %markup.display(), output = %output.display(), "running renderer");

        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(markup)
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| FolioError::RendererSpawn { program: self.program.to_string_lossy().into_owned(), source })?;

        Ok(RenderOutcome {
            exit_code: result.status.code(),
            stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        })
    }
}

/// Result of [`create_pdf`].
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    /// Where the PDF was asked to go. Returned even if rendering failed.
    pub path: PathBuf,
    pub outcome: RenderOutcome,
}

/// A markup file staged for the renderer; deleted on drop.
#[derive(Debug)]
pub struct StagedMarkup {
    path: TempPath,
}

impl StagedMarkup {
    /// Writes `markup` to a fresh temp file and renames it to `<name>.html`.
    ///
    /// The file lands in `dir`, or the system temp dir when `None`. The
    /// rename fails loudly if the temp file disappeared in between.
    pub fn write(markup: &str, dir: Option<&Path>) -> Result<Self> {
        let mut file = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        file.write_all(markup.as_bytes())?;
        file.flush()?;

        let temp = file.into_temp_path();
        let mut html_name = temp.as_os_str().to_os_string();
        html_name.push(".html");
        let html_path = PathBuf::from(html_name);

        temp.persist(&html_path)?;
        Ok(Self { path: TempPath::from_path(html_path) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the staged file, reporting any error.
    pub fn remove(self) -> Result<()> {
        self.path.close()?;
        Ok(())
    }
}

/// Stages `document`, renders it to `pdf_path`, and cleans up.
///
/// Creates the PDF's parent directory if needed. The staged markup file is
/// removed after the renderer returns, including when it returns an error.
pub fn create_pdf<R: Renderer + ?Sized>(
    document: &AssembledDocument, pdf_path: &Path, renderer: &R, staging_dir: Option<&Path>,
) -> Result<RenderedPdf> {
    ensure_parent(pdf_path)?;

    let staged = StagedMarkup::write(document.markup(), staging_dir)?;
    tracing::debug!(staged = %staged.path().display(), pdf = %pdf_path.display(), "staged markup");

    let rendered = renderer.render(staged.path(), pdf_path);
    staged.remove()?;

    Ok(RenderedPdf { path: pdf_path.to_path_buf(), outcome: rendered? })
}
