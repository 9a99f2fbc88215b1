//! Command: verify the Makefile on disk matches fresh output.
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{CommandSetup, process_env};
use crate::cli::{CheckOpts, GlobalOpts};
use crate::logging::Logger;
use crate::render::render;
use crate::rules::expand;

/// Run the check command.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve or the Makefile is
/// missing or out of date.
pub fn run(global: &GlobalOpts, opts: &CheckOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, process_env()?, log)?;
    check_makefile(&setup, &opts.output, log)
}

/// Compare `output` under the project root with freshly rendered text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or differs.
pub fn check_makefile(setup: &CommandSetup, output: &Path, log: &Logger) -> Result<()> {
    log.stage("Checking Makefile");
    let path = setup.project_path(output);
    let existing =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let expected = render(&expand(&setup.config));
    if existing != expected {
        if let Some((line, _)) = existing
            .lines()
            .zip(expected.lines())
            .enumerate()
            .find(|(_, (have, want))| have != want)
        {
            log.debug(&format!("first difference at line {}", line + 1));
        }
        anyhow::bail!(
            "{} is out of date; run `pybuild generate`",
            path.display()
        );
    }
    log.info(&format!("{} is up to date", path.display()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::generate::write_makefile;
    use crate::logging::captured_logger;

    fn setup(dir: &Path, set: &[&str]) -> CommandSetup {
        let (log, _buf, _guard) = captured_logger();
        let global = GlobalOpts {
            directory: Some(dir.to_path_buf()),
            set: set.iter().map(ToString::to_string).collect(),
            ..GlobalOpts::default()
        };
        CommandSetup::init(&global, [("HOME", "/root")], &log).unwrap()
    }

    #[test]
    fn fresh_makefile_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let setup = setup(tmp.path(), &[]);
        let (log, _buf, _guard) = captured_logger();
        write_makefile(&setup, Path::new("Makefile"), false, &log).unwrap();
        check_makefile(&setup, Path::new("Makefile"), &log).unwrap();
    }

    #[test]
    fn stale_makefile_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, _buf, _guard) = captured_logger();
        write_makefile(&setup(tmp.path(), &[]), Path::new("Makefile"), false, &log).unwrap();
        let changed = setup(tmp.path(), &["PYLINT=0"]);
        let err = check_makefile(&changed, Path::new("Makefile"), &log).unwrap_err();
        assert!(err.to_string().contains("out of date"));
    }

    #[test]
    fn missing_makefile_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let setup = setup(tmp.path(), &[]);
        let (log, _buf, _guard) = captured_logger();
        assert!(check_makefile(&setup, Path::new("Makefile"), &log).is_err());
    }
}
