use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use folio_core::{ExportConfig, ExportConfigBuilder, run_export};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Export saved Instapaper articles to PDF, with highlights as Markdown notes
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author = "Folio Contributors")]
#[command(version)]
#[command(about = "Export Instapaper articles to PDF with highlight notes", long_about = None)]
struct Args {
    /// Config file (default: <config dir>/folio/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Instapaper OAuth consumer key
    #[arg(long, env = "FOLIO_API_KEY", hide_env_values = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Instapaper OAuth consumer secret
    #[arg(long, env = "FOLIO_API_SECRET", hide_env_values = true, value_name = "SECRET")]
    api_secret: Option<String>,

    /// Instapaper account login
    #[arg(long, env = "FOLIO_LOGIN", value_name = "LOGIN")]
    login: Option<String>,

    /// Instapaper account password
    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true, value_name = "PASSWORD")]
    password: Option<String>,

    /// Folder to export from
    #[arg(short, long, value_name = "NAME")]
    folder: Option<String>,

    /// Maximum number of bookmarks to export
    #[arg(short, long, value_name = "NUM")]
    limit: Option<u32>,

    /// Root directory for PDFs (laid out as <year>/<month>/<title>.pdf)
    #[arg(long, value_name = "DIR")]
    pdf_root: Option<PathBuf>,

    /// Directory for highlight notes
    #[arg(long, value_name = "DIR")]
    notes_root: Option<PathBuf>,

    /// HTML-to-PDF renderer executable
    #[arg(long, value_name = "PROGRAM")]
    renderer: Option<String>,

    /// Directory for staged HTML files
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<PathBuf>,

    /// Archive each bookmark once its PDF has rendered
    #[arg(long, overrides_with = "no_archive")]
    archive: bool,

    /// Leave bookmarks in their folder, even if the config file says to archive
    #[arg(long, overrides_with = "archive")]
    no_archive: bool,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Instapaper API host
    #[arg(long, env = "FOLIO_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Args {
    /// Layers command-line and environment values over the config file.
    fn into_config(self) -> anyhow::Result<ExportConfig> {
        let file = ExportConfig::discover(self.config.as_deref()).context("Failed to load config")?;
        let mut builder = ExportConfigBuilder::from_config(file);

        if let Some(value) = self.api_key {
            builder = builder.api_key(value);
        }
        if let Some(value) = self.api_secret {
            builder = builder.api_secret(value);
        }
        if let Some(value) = self.login {
            builder = builder.login(value);
        }
        if let Some(value) = self.password {
            builder = builder.password(value);
        }
        if let Some(value) = self.folder {
            builder = builder.folder(value);
        }
        if let Some(value) = self.limit {
            builder = builder.limit(value);
        }
        if let Some(value) = self.pdf_root {
            builder = builder.pdf_root(value);
        }
        if let Some(value) = self.notes_root {
            builder = builder.notes_root(value);
        }
        if let Some(value) = self.renderer {
            builder = builder.renderer(value);
        }
        if let Some(value) = self.staging_dir {
            builder = builder.staging_dir(value);
        }
        if let Some(value) = self.timeout {
            builder = builder.timeout(value);
        }
        if let Some(value) = self.api_url {
            builder = builder.api_url(value);
        }
        if self.archive {
            builder = builder.archive(true);
        } else if self.no_archive {
            builder = builder.archive(false);
        }

        Ok(builder.build())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio_core=debug" } else { "folio_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "folio", &mut io::stdout());
        return Ok(());
    }

    let verbose = args.verbose;
    init_tracing(verbose);

    if verbose {
        echo::print_banner();
        echo::print_step(1, 2, "Loading configuration");
    }

    let config = args.into_config()?;
    config.validate().context("Invalid configuration")?;

    if verbose {
        echo::print_config(&config);
        echo::print_step(2, 2, &format!("Exporting from folder {}", config.folder.bright_white()));
    }

    let report = run_export(&config).await.context("Export failed")?;

    for article in &report.exported {
        if !article.rendered() {
            echo::print_warning(&format!(
                "Renderer failed for \"{}\" (exit code {})",
                article.title,
                article.render.exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
            ));
        }
    }
    for failure in &report.failures {
        echo::print_error(&format!("Skipped \"{}\": {}", failure.title, failure.error));
    }

    echo::print_report(&report, verbose);
    Ok(())
}
