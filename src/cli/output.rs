//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! run reports to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::exporter::ExportReport;
use crate::model::{BatchSummary, OperationResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Album result row for table display.
#[derive(Tabled)]
struct AlbumResultRow {
    #[tabled(rename = "Album")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Added")]
    added: usize,
    #[tabled(rename = "Updated")]
    updated: usize,
    #[tabled(rename = "Removed")]
    removed: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the summary of a `share-albums` run.
    #[must_use]
    pub fn format_summary(&self, summary: &BatchSummary) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Text => Self::format_summary_text(summary),
        }
    }

    /// Formats a summary as text.
    fn format_summary_text(summary: &BatchSummary) -> String {
        let mut output = String::new();

        if summary.results.is_empty() {
            output.push_str("No albums to process.\n");
            return output;
        }

        let rows: Vec<AlbumResultRow> = summary
            .results
            .iter()
            .map(|r| AlbumResultRow {
                name: Self::truncate(&r.album_name, 40),
                id: Self::truncate(&r.album_id, 12),
                status: Self::format_status(r),
                added: r.added,
                updated: r.updated,
                removed: r.removed,
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push_str("\n\n");

        let _ = write!(output, "{summary}");

        let header = if summary.is_success() {
            format!("{} All albums processed", "✓".green())
        } else {
            format!("{} {} album(s) failed", "✗".red(), summary.failed)
        };
        let _ = writeln!(output, "\n{header}");

        output
    }

    /// Formats the result of a `list-all` export.
    #[must_use]
    pub fn format_export(&self, report: &ExportReport, path: &Path) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "output": path.display().to_string(),
                    "albums": report.albums,
                    "failed": report.failed,
                    "max_users": report.max_users(),
                    "rows": report.rows,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = format!("{} Created table file: {}\n", "✓".green(), path.display());
                let _ = writeln!(output, "   Albums: {}", report.albums);
                let _ = writeln!(output, "   Rows: {}", report.rows.len());
                let _ = writeln!(output, "   Maximum users in any row: {}", report.max_users());

                if report.failed > 0 {
                    let _ = write!(
                        output,
                        "\n{} {} album(s) could not be read:\n",
                        "⚠".yellow(),
                        report.failed
                    );
                    for row in report.rows.iter().filter(|row| row.error.is_some()) {
                        let _ = writeln!(
                            output,
                            "   - {} ({}): {}",
                            row.album_name,
                            row.album_id,
                            row.error.as_deref().unwrap_or_default()
                        );
                    }
                }

                output
            }
        }
    }

    /// Formats an album status with color.
    fn format_status(result: &OperationResult) -> String {
        if !result.success {
            "failed".red().to_string()
        } else if result.change_count() == 0 {
            "unchanged".dimmed().to_string()
        } else if result.dry_run {
            "planned".yellow().to_string()
        } else {
            "updated".green().to_string()
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}
