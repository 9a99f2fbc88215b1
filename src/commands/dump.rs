//! Command: print the fully expanded rule set.
use anyhow::Result;
use serde::Serialize;

use super::{CommandSetup, process_env};
use crate::cli::{DumpFormat, DumpOpts, GlobalOpts};
use crate::config::ResolvedConfig;
use crate::logging::Logger;
use crate::render::render;
use crate::rules::{RuleSet, expand};

/// JSON document printed by `dump --format json`.
#[derive(Debug, Serialize)]
struct DumpDocument<'a> {
    config: &'a ResolvedConfig,
    rules: &'a RuleSet,
}

/// Run the dump command.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve or serialization
/// fails.
pub fn run(global: &GlobalOpts, opts: &DumpOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, process_env()?, log)?;
    print!("{}", dump(&setup.config, opts.format)?);
    Ok(())
}

/// Text of the dump in `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn dump(config: &ResolvedConfig, format: DumpFormat) -> Result<String> {
    let rules = expand(config);
    Ok(match format {
        DumpFormat::Make => render(&rules),
        DumpFormat::Json => {
            let mut text = serde_json::to_string_pretty(&DumpDocument {
                config,
                rules: &rules,
            })?;
            text.push('\n');
            text
        }
    })
}
