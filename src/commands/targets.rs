//! Command: list umbrella targets and their constituents.
use anyhow::Result;

use super::{CommandSetup, process_env};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::rules::{RuleSet, expand};

/// Run the targets command.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, process_env()?, log)?;
    print!("{}", listing(&expand(&setup.config)));
    Ok(())
}

/// One line per entry point: the name, then its prerequisites.
#[must_use]
pub fn listing(rules: &RuleSet) -> String {
    let entries = rules.entry_points();
    let width = entries.iter().map(|t| t.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|target| {
            let line = format!("{:width$}  {}", target.name, target.prerequisites.join(" "));
            format!("{}\n", line.trim_end())
        })
        .collect()
}
