//! Export configuration.
//!
//! The config file lives at `<config dir>/folio/config.toml` (see
//! [`ExportConfig::default_path`]); every field is optional in the file and
//! the CLI can override any of them. Credentials must be present by the time
//! [`ExportConfig::validate`] runs.
//!
//! ```toml
//! api_key = "consumer key"
//! api_secret = "consumer secret"
//! login = "me@example.com"
//! password = "hunter2"
//! pdf_root = "/home/me/Articles"
//! notes_root = "/home/me/Notes/highlights"
//! folder = "keep"
//! limit = 5
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::layout::OutputLayout;
use crate::render::DEFAULT_RENDERER;
use crate::{FolioError, Result};

/// Instapaper API host.
pub const DEFAULT_API_URL: &str = "https://www.instapaper.com";

/// Settings for one export run.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// OAuth consumer key issued by Instapaper.
    pub api_key: String,
    /// OAuth consumer secret issued by Instapaper.
    pub api_secret: String,
    /// Instapaper account login (usually the email address).
    pub login: String,
    /// Instapaper account password; may be empty for password-less accounts.
    pub password: String,
    /// Root directory for PDFs, laid out as `<year>/<month>/<title>.pdf`.
    pub pdf_root: PathBuf,
    /// Directory for `NOTES - <title>.md` files.
    pub notes_root: PathBuf,
    /// Folder to export from.
    pub folder: String,
    /// Maximum number of bookmarks per run.
    pub limit: u32,
    /// Renderer executable, called as `<renderer> <input.html> <output.pdf>`.
    pub renderer: String,
    /// Where staged markup files go; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
    /// Archive each bookmark after it has been exported.
    pub archive: bool,
    /// HTTP timeout in seconds.
    pub timeout: u64,
    /// API host; only worth changing for testing.
    pub api_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let pdf_root = std::env::temp_dir().join("instapaper");
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            login: String::new(),
            password: String::new(),
            notes_root: pdf_root.join("highlights"),
            pdf_root,
            folder: "keep".to_string(),
            limit: 5,
            renderer: DEFAULT_RENDERER.to_string(),
            staging_dir: None,
            archive: false,
            timeout: 30,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("pdf_root", &self.pdf_root)
            .field("notes_root", &self.notes_root)
            .field("folder", &self.folder)
            .field("limit", &self.limit)
            .field("renderer", &self.renderer)
            .field("staging_dir", &self.staging_dir)
            .field("archive", &self.archive)
            .field("timeout", &self.timeout)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ExportConfig {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::new()
    }

    /// `<config dir>/folio/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    /// Parses a TOML document. Missing fields keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FolioError::ConfigError(e.to_string()))
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| FolioError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Loads `path` if given, else the default file if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Checks that the run can authenticate and has somewhere to write.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [("api_key", &self.api_key), ("api_secret", &self.api_secret), ("login", &self.login)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(FolioError::ConfigError(format!("missing {}", missing.join(", "))));
        }
        if self.folder.trim().is_empty() {
            return Err(FolioError::ConfigError("folder name is empty".to_string()));
        }
        if self.limit == 0 {
            return Err(FolioError::ConfigError("limit must be at least 1".to_string()));
        }
        if self.renderer.trim().is_empty() {
            return Err(FolioError::ConfigError("renderer is empty".to_string()));
        }
        Ok(())
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.pdf_root, &self.notes_root)
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing config, e.g. one loaded from disk.
    pub fn from_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.config.api_key = value.into();
        self
    }

    pub fn api_secret(mut self, value: impl Into<String>) -> Self {
        self.config.api_secret = value.into();
        self
    }

    pub fn login(mut self, value: impl Into<String>) -> Self {
        self.config.login = value.into();
        self
    }

    pub fn password(mut self, value: impl Into<String>) -> Self {
        self.config.password = value.into();
        self
    }

    pub fn pdf_root(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.pdf_root = value.into();
        self
    }

    pub fn notes_root(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.notes_root = value.into();
        self
    }

    pub fn folder(mut self, value: impl Into<String>) -> Self {
        self.config.folder = value.into();
        self
    }

    pub fn limit(mut self, value: u32) -> Self {
        self.config.limit = value;
        self
    }

    pub fn renderer(mut self, value: impl Into<String>) -> Self {
        self.config.renderer = value.into();
        self
    }

    pub fn staging_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.staging_dir = Some(value.into());
        self
    }

    pub fn archive(mut self, value: bool) -> Self {
        self.config.archive = value;
        self
    }

    pub fn timeout(mut self, value: u64) -> Self {
        self.config.timeout = value;
        self
    }

    pub fn api_url(mut self, value: impl Into<String>) -> Self {
        self.config.api_url = value.into();
        self
    }

    pub fn build(self) -> ExportConfig {
        self.config
    }
}
