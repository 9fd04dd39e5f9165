//! Console presentation: parameter table and progress reporting.

mod parameters;
mod reporter;

pub use parameters::ParameterTable;
pub use reporter::ConsoleReporter;

/// Turns colored output off for the rest of the process.
pub fn disable_colors() {
    colored::control::set_override(false);
}
