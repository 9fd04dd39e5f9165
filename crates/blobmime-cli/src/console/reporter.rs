//! Progress output on stdout.

use std::error::Error;
use std::io::{self, Write};

use blobmime_core::{BlobEntry, Reporter, RunSummary};
use colored::Colorize;

/// Prints one line per inspected, updated or failed blob and a final summary.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    dry_run: bool,
}

impl ConsoleReporter {
    /// Creates a reporter; `dry_run` only changes the wording.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn line(&self, line: String) {
        let mut stdout = io::stdout().lock();
        // A closed stdout (e.g. piped into `head`) must not abort the run.
        let _ = writeln!(stdout, "{line}");
    }
}

impl Reporter for ConsoleReporter {
    fn inspecting(&self, entry: &BlobEntry) {
        self.line(format!("Inspecting {}", quoted(&entry.name).green()));
    }

    fn updating(&self, entry: &BlobEntry, content_type: &str, dry_run: bool) {
        let verb = if dry_run { "Would update" } else { "Updating" };
        let previous = entry.content_type.as_deref().unwrap_or_default();
        self.line(format!(
            "{verb} {} {} => {}",
            quoted(&entry.name).green(),
            quoted(previous).dimmed(),
            quoted(content_type).green()
        ));
    }

    fn failed(&self, name: &str, error: &(dyn Error + 'static)) {
        self.line(format!(
            "{} {}: {}",
            "Failed".red().bold(),
            quoted(name).yellow(),
            error_chain(error).red()
        ));
    }

    fn finished(&self, summary: &RunSummary) {
        let headline = if self.dry_run {
            format!(
                "Dry run completed, {} file(s) would be updated.",
                summary.would_update.to_string().green()
            )
        } else {
            format!(
                "Update completed, {} file(s) updated.",
                summary.updated.to_string().green()
            )
        };
        self.line(headline);

        let details = format!(
            "{} inspected, {} already correct, {} without mapping, {} failed",
            summary.inspected, summary.unchanged, summary.unknown, summary.failed
        );
        if summary.has_failures() {
            self.line(details.yellow().to_string());
        } else {
            self.line(details.dimmed().to_string());
        }
    }
}

fn quoted(value: &str) -> String {
    format!("'{value}'")
}

/// Joins an error and its sources with `: `.
fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
