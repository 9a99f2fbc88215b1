//! Command: write the Makefile.
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{CommandSetup, process_env};
use crate::cli::{GenerateOpts, GlobalOpts};
use crate::logging::Logger;
use crate::render::{is_generated, render};
use crate::rules::expand;

/// What `generate` did to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was created or replaced.
    Written,
    /// The file already held identical content.
    Unchanged,
}

/// Run the generate command.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve, the output would
/// overwrite a hand-written file without `--force`, or writing fails.
pub fn run(global: &GlobalOpts, opts: &GenerateOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, process_env()?, log)?;
    write_makefile(&setup, &opts.output, opts.force, log)?;
    Ok(())
}

/// Render the rule set and write it to `output` under the project root.
///
/// # Errors
///
/// Returns an error if `output` exists, lacks the generated header and
/// `force` is not set, or if the file cannot be read or written.
pub fn write_makefile(
    setup: &CommandSetup,
    output: &Path,
    force: bool,
    log: &Logger,
) -> Result<Outcome> {
    log.stage("Generating Makefile");
    let rules = expand(&setup.config);
    let text = render(&rules);
    let path = setup.project_path(output);

    if path.exists() {
        let existing = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        if existing == text {
            log.info(&format!("{} is up to date", path.display()));
            return Ok(Outcome::Unchanged);
        }
        anyhow::ensure!(
            force || is_generated(&existing),
            "{} was not generated by pybuild; use --force to overwrite it",
            path.display()
        );
    }

    fs::write(&path, &text).with_context(|| format!("writing {}", path.display()))?;
    log.info(&format!(
        "wrote {} ({} targets)",
        path.display(),
        rules.targets().count()
    ));
    Ok(Outcome::Written)
}
