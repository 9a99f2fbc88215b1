pub mod check;
pub mod dump;
pub mod generate;
pub mod plan;
pub mod targets;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::toml_loader::{PROJECT_FILE, load_config};
use crate::config::validation::{DockerValidator, validate_all};
use crate::config::variables::ENV_PREFIX;
use crate::config::{self, Category, Layer, ProjectFile, ResolvedConfig, RuntimeSpec, Variables};
use crate::logging::Logger;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates project discovery, layered variable loading, resolution and
/// validation so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Canonical project directory.
    pub root: PathBuf,
    /// Layered variable table.
    pub variables: Variables,
    /// Resolved configuration.
    pub config: ResolvedConfig,
}

impl CommandSetup {
    /// Locate the project, stack every configuration layer, resolve, and
    /// report validation warnings.
    ///
    /// `env` is a snapshot of the process environment; only `PYBUILD_*`
    /// entries are consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directory does not exist, an explicit
    /// `--config` file is missing, or any layer fails to parse or resolve.
    pub fn init<I, K, V>(global: &GlobalOpts, env: I, log: &Logger) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let root = resolve_root(global)?;
        let project = project_name(&root);

        log.stage("Loading configuration");
        let path = config_path(global, &root)?;
        log.debug(&format!("project file: {}", path.display()));
        let file: ProjectFile = load_config(&path)?;
        let variables = config::layer_variables(&file, env, &global.set)?;
        for (name, assignment) in variables.iter() {
            if assignment.layer != Layer::Default {
                log.debug(&format!(
                    "{name} = {:?} (from {})",
                    assignment.value, assignment.layer
                ));
            }
        }

        log.stage("Resolving configuration");
        let config = config::resolve(&variables, &project)?;
        let ids: Vec<&str> = config.runtimes.iter().map(RuntimeSpec::id).collect();
        log.info(&format!("project: {project}"));
        log.info(&format!("runtimes: {}", ids.join(", ")));
        for category in Category::ALL {
            log.debug(&format!(
                "{category}: {}",
                config.toolchains.activation(category).as_str()
            ));
        }

        for warning in validate_all(&variables, &config, &DockerValidator::detect()) {
            log.warn(&format!(
                "{} [{}]: {}",
                warning.source, warning.item, warning.message
            ));
        }

        Ok(Self {
            root,
            variables,
            config,
        })
    }

    /// Resolve `path` against the project directory.
    #[must_use]
    pub fn project_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Snapshot of the process environment for [`CommandSetup::init`].
///
/// # Errors
///
/// Returns an error if a `PYBUILD_*` value is not valid Unicode.
pub fn process_env() -> Result<Vec<(String, String)>> {
    env_snapshot(std::env::vars_os())
}

/// Keep the entries that are valid Unicode. Other entries cannot be
/// configuration and are skipped, except a `PYBUILD_*` name whose value
/// cannot be read.
fn env_snapshot<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut entries = Vec::new();
    for (key, value) in vars {
        let Ok(key) = key.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => entries.push((key, value)),
            Err(_) if key.starts_with(ENV_PREFIX) => {
                anyhow::bail!("environment variable {key} is not valid UTF-8");
            }
            Err(_) => {}
        }
    }
    Ok(entries)
}

/// Canonical project directory from `-C`, defaulting to the working directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let dir = global
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    dunce::canonicalize(&dir)
        .with_context(|| format!("project directory not found: {}", dir.display()))
}

/// Project name: the final component of the project directory.
#[must_use]
pub fn project_name(root: &Path) -> String {
    root.file_name().map_or_else(
        || "project".to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn config_path(global: &GlobalOpts, root: &Path) -> Result<PathBuf> {
    match &global.config {
        Some(path) => {
            let path = if path.is_relative() {
                root.join(path)
            } else {
                path.clone()
            };
            anyhow::ensure!(path.is_file(), "config file not found: {}", path.display());
            Ok(path)
        }
        None => Ok(root.join(PROJECT_FILE)),
    }
}
