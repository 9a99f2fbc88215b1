//! The typed per-(category, runtime) rule template.
use super::command::CommandLine;
use super::wrapper::ExecutionWrapper;
use super::{GeneratedRule, Target, TargetKind};
use crate::config::resolve::PipSettings;
use crate::config::{Category, RuntimeSpec};

/// Root of every isolated environment.
pub const VENV_ROOT: &str = "build/venv";

/// Named slots of one (category, runtime) rule pair.
///
/// All paths are derived from the category and runtime slug; nothing is
/// interpolated outside this type.
#[derive(Debug, Clone)]
pub struct RuleTemplate<'a> {
    /// Category being expanded.
    pub category: Category,
    /// Bound runtime.
    pub runtime: &'a RuntimeSpec,
    /// `build/venv/<category>-<slug>`
    pub env_path: String,
    /// `<env_path>.build`
    pub marker: String,
    /// Sandbox prefix.
    pub wrapper: ExecutionWrapper,
}

impl<'a> RuleTemplate<'a> {
    /// Fill the slots for `category` bound to `runtime`.
    #[must_use]
    pub fn new(category: Category, runtime: &'a RuntimeSpec) -> Self {
        let env_path = format!("{VENV_ROOT}/{}-{}", category.name(), runtime.slug());
        let marker = format!("{env_path}.build");
        Self {
            category,
            runtime,
            env_path,
            marker,
            wrapper: ExecutionWrapper::for_runtime(runtime),
        }
    }

    /// Action target name: `<category>-<slug>`.
    #[must_use]
    pub fn target_name(&self) -> String {
        format!("{}-{}", self.category.name(), self.runtime.slug())
    }

    /// A command running `tool` from the environment's `bin` directory.
    #[must_use]
    pub fn tool(&self, tool: &str) -> CommandLine {
        self.wrapper.command().arg(format!("{}/bin/{tool}", self.env_path))
    }

    /// Provisioning recipe: pull guard, venv, pip upgrade, packages, touch.
    #[must_use]
    pub fn install_recipe(&self, pip: &PipSettings, packages: &[String]) -> Vec<String> {
        let mut recipe: Vec<String> = self.wrapper.pull_guard().into_iter().collect();
        recipe.push(
            self.wrapper
                .command()
                .args(["python3", "-m", "venv", self.env_path.as_str()])
                .build(),
        );
        recipe.push(
            self.tool("pip")
                .arg("-q")
                .arg(&pip.args)
                .arg("install")
                .arg(&pip.install_args)
                .arg("--upgrade pip setuptools wheel")
                .build(),
        );
        recipe.push(
            self.tool("pip")
                .arg(&pip.args)
                .arg("install")
                .arg(&pip.install_args)
                .args(packages)
                .build(),
        );
        recipe.push(format!("touch {}", self.marker));
        recipe
    }

    /// Produce the install/action pair.
    #[must_use]
    pub fn instantiate(
        self,
        pip: &PipSettings,
        packages: &[String],
        actions: Vec<String>,
    ) -> GeneratedRule {
        let install = Target {
            name: self.marker.clone(),
            kind: TargetKind::Marker,
            prerequisites: Vec::new(),
            recipe: self.install_recipe(pip, packages),
        };
        let action = Target {
            name: self.target_name(),
            kind: TargetKind::Action,
            prerequisites: vec![self.marker.clone()],
            recipe: actions,
        };
        GeneratedRule {
            category: self.category,
            runtime: self.runtime.clone(),
            env_path: self.env_path,
            install,
            action,
        }
    }
}
