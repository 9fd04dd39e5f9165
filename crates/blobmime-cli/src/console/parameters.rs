//! Summary of the run parameters shown before confirmation.

use std::fmt;

use blobmime_core::UpdatePolicy;
use colored::Colorize;

use crate::config::{ResolvedStorage, RunConfig};

/// Two-column table of the parameters a run will use.
///
/// The connection string is never shown.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    title: String,
    rows: Vec<(&'static str, String)>,
}

impl ParameterTable {
    /// Collects the parameters of a run.
    pub fn new(storage: &ResolvedStorage, run: &RunConfig) -> Self {
        let prefix = if storage.prefix.is_empty() {
            "(entire container)".to_string()
        } else {
            storage.prefix.clone()
        };

        let policy = match run.policy() {
            UpdatePolicy::CompareThenUpdate => "only mismatched",
            UpdatePolicy::Always => "all mapped (forced)",
        };

        let mut rows = vec![
            ("Container Name", storage.container.clone()),
            ("Prefix", prefix),
            ("Update", policy.to_string()),
            ("Dry Run", if run.dry_run { "yes" } else { "no" }.to_string()),
            ("Concurrency", run.concurrency.to_string()),
        ];

        rows.extend(run.overrides.iter().map(|o| {
            ("Mapping", format!("{} => {}", o.extension, o.content_type))
        }));

        Self {
            title: format!("blobmime {}", env!("CARGO_PKG_VERSION")),
            rows,
        }
    }
}

impl fmt::Display for ParameterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        let value_width = self
            .rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);
        let rule = "─".repeat(label_width + value_width + 5);

        writeln!(f, "{}", self.title.white().bold())?;
        writeln!(f, "{}", rule.cyan())?;
        writeln!(
            f,
            " {} │ {}",
            format!("{:<label_width$}", "Parameter").yellow().bold(),
            "Value".yellow().bold()
        )?;
        writeln!(f, "{}", rule.cyan())?;
        for (label, value) in &self.rows {
            writeln!(f, " {} │ {}", format!("{label:<label_width$}").blue(), value)?;
        }
        write!(f, "{}", rule.cyan())
    }
}
