use folio_core::{ExportConfig, ExportReport};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Folio".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Export Instapaper articles to PDF\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print the settings that decide where files land
pub fn print_config(config: &ExportConfig) {
    eprintln!("  {} {}", "Login:".dimmed(), config.login.bright_white());
    eprintln!("  {} {}", "Limit:".dimmed(), config.limit.to_string().bright_white());
    eprintln!("  {} {}", "PDFs:".dimmed(), config.pdf_root.display().bright_white());
    eprintln!("  {} {}", "Notes:".dimmed(), config.notes_root.display().bright_white());
    eprintln!("  {} {}\n", "Renderer:".dimmed(), config.renderer.bright_white());
}

/// Print the run summary; per-article lines only in verbose mode
pub fn print_report(report: &ExportReport, verbose: bool) {
    if verbose {
        eprintln!("\n{}", "═".repeat(60).dimmed());
        eprintln!("{}", "Exported Articles".bold().cyan());
        eprintln!("{}", "═".repeat(60).dimmed());
        for article in &report.exported {
            let mark = if article.rendered() { "✓".green().to_string() } else { "⚠".yellow().to_string() };
            eprintln!("  {} {}", mark, article.pdf_path.display().bright_white());
            if let Some(notes) = article.highlights.written() {
                eprintln!("    {} {}", "Notes:".dimmed(), notes.display());
            }
            if article.archived {
                eprintln!("    {}", "archived".dimmed());
            }
        }
        eprintln!();
    }

    let summary = format!(
        "{} exported, {} PDFs rendered, {} note files written",
        report.exported.len(),
        report.rendered_count(),
        report.notes_count()
    );
    if report.failures.is_empty() {
        print_success(&summary);
    } else {
        print_warning(&format!("{}, {} skipped", summary, report.failures.len()));
    }
}
