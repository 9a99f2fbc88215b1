//! Command: show what `make` would run without running it.
use anyhow::Result;

use super::{CommandSetup, process_env};
use crate::cli::{GlobalOpts, PlanOpts};
use crate::logging::Logger;
use crate::plan::{FsProbe, plan};
use crate::rules::expand;

/// Run the plan command.
///
/// Marker files are probed under the project directory, so the plan
/// reflects environments that were already provisioned.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve or a goal is unknown.
pub fn run(global: &GlobalOpts, opts: &PlanOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, process_env()?, log)?;
    let rules = expand(&setup.config);
    let goals = if opts.goals.is_empty() {
        vec![rules.default_goal.clone()]
    } else {
        opts.goals.clone()
    };

    log.stage(&format!("Planning {}", goals.join(" ")));
    let probe = FsProbe::new(&setup.root);
    let plan = plan(&rules, &goals, &probe)?;
    log.debug(&format!("{} command(s)", plan.commands().count()));
    print!("{plan}");
    Ok(())
}
