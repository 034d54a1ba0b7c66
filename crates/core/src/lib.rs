pub mod assemble;
pub mod bookmark;
pub mod config;
pub mod error;
pub mod export;
pub mod highlights;
pub mod layout;
pub mod parse;
pub mod render;
pub mod source;

pub use assemble::{AssembledDocument, DocumentAssembler, STYLESHEET, escape_html, front_matter_fragment};
pub use bookmark::{Bookmark, Folder, Highlight};
pub use config::{ExportConfig, ExportConfigBuilder};
pub use error::{FolioError, Result};
#[cfg(feature = "fetch")]
pub use export::run_export;
pub use export::{ExportOptions, ExportReport, ExportedArticle, Exporter, FailedArticle};
pub use highlights::{HighlightExport, export_highlights, format_notes};
pub use layout::{OutputLayout, year_month, year_month_in};
pub use parse::Document;
pub use render::{CommandRenderer, RenderOutcome, RenderedPdf, Renderer, StagedMarkup, create_pdf};
pub use source::{BookmarkSource, find_folder_id};
#[cfg(feature = "fetch")]
pub use source::{Credentials, InstapaperClient};
