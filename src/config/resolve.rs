//! Configuration resolution.
//!
//! Turns a layered [`Variables`] table into a [`ResolvedConfig`]: the final
//! ordered runtime list plus settings for every category. Resolution is pure;
//! the process environment and the filesystem are only touched by callers.
use serde::Serialize;

use super::runtime::{RuntimeSpec, resolve_runtimes};
use super::toolchain::{
    CoverSettings, DocSettings, LintSettings, ParallelSettings, PinnedTool, Toolchain,
    Toolchains,
};
use super::variables::Variables;
use crate::error::ConfigError;

/// Where category commands run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Execution {
    /// Inside a throwaway container per command.
    Container,
    /// Directly on the host.
    Direct,
}

/// pip invocation arguments shared by every install rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipSettings {
    /// Global pip arguments.
    pub args: String,
    /// `pip install` arguments.
    pub install_args: String,
}

/// Test runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSettings {
    /// Test selection; full discovery when `None`.
    pub filter: Option<String>,
    /// unittest arguments.
    pub args: String,
    /// Extra package specifiers installed into every Python environment,
    /// passed to pip as shell text.
    pub require: Option<String>,
}

/// Normalized configuration consumed by the rule expander.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Project name, used for default paths.
    pub project: String,
    /// Execution mode.
    pub execution: Execution,
    /// Runtimes in resolved order, without duplicates or excluded entries.
    pub runtimes: Vec<RuntimeSpec>,
    /// pip arguments.
    pub pip: PipSettings,
    /// Test runner settings.
    pub test: TestSettings,
    /// Optional toolchains.
    pub toolchains: Toolchains,
}

impl ResolvedConfig {
    /// Every distinct container image, in runtime order.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        let mut images: Vec<&str> = Vec::new();
        for image in self.runtimes.iter().filter_map(RuntimeSpec::image) {
            if !images.contains(&image) {
                images.push(image);
            }
        }
        images
    }
}

/// Resolve layered variables into a normalized configuration.
///
/// # Errors
///
/// Returns an error if a runtime identifier is invalid or two identifiers
/// collide after slugging.
pub fn resolve(variables: &Variables, project: &str) -> Result<ResolvedConfig, ConfigError> {
    let execution = if variables.flag("NO_DOCKER") {
        Execution::Direct
    } else {
        Execution::Container
    };

    let images = variables.words("PYTHON_IMAGES");
    let exclude = variables.words("PYTHON_IMAGES_EXCLUDE");
    let mut runtimes = resolve_runtimes(&images, &exclude)?;
    if execution == Execution::Direct {
        // Every image would run on the same host interpreter.
        runtimes = vec![RuntimeSpec::host()];
    }

    let pip = PipSettings {
        args: variables.text("PIP_ARGS").to_string(),
        install_args: variables.text("PIP_INSTALL_ARGS").to_string(),
    };
    let test = TestSettings {
        filter: variables.optional("TEST"),
        args: variables.text("UNITTEST_ARGS").to_string(),
        require: variables.optional("TESTS_REQUIRE"),
    };

    Ok(ResolvedConfig {
        project: project.to_string(),
        execution,
        runtimes,
        pip,
        test,
        toolchains: resolve_toolchains(variables, project),
    })
}

fn resolve_toolchains(variables: &Variables, project: &str) -> Toolchains {
    let text = |name: &str| variables.text(name).to_string();

    let parallel = Toolchain::new(
        variables.flag("UNITTEST_PARALLEL"),
        variables,
        ParallelSettings::OVERRIDES,
        ParallelSettings {
            version: text("UNITTEST_PARALLEL_VERSION"),
            args: text("UNITTEST_PARALLEL_ARGS"),
            coverage_args: text("UNITTEST_PARALLEL_COVERAGE_ARGS"),
        },
    );

    let cover = Toolchain::new(
        variables.flag("COVERAGE"),
        variables,
        CoverSettings::OVERRIDES,
        CoverSettings {
            version: text("COVERAGE_VERSION"),
            args: text("COVERAGE_ARGS"),
            report_args: text("COVERAGE_REPORT_ARGS"),
            all_runtimes: variables.flag("COVERAGE_ALL_RUNTIMES"),
        },
    );

    let lint = Toolchain::new(
        variables.flag("PYLINT"),
        variables,
        LintSettings::OVERRIDES,
        LintSettings {
            version: text("PYLINT_VERSION"),
            args: text("PYLINT_ARGS"),
        },
    );

    let source = text("SPHINX_DOC");
    let gh_pages_dir = variables
        .optional("GH_PAGES_DIR")
        .unwrap_or_else(|| format!("../{project}.gh-pages"));
    let doc = Toolchain::new(
        !source.is_empty(),
        variables,
        DocSettings::OVERRIDES,
        DocSettings {
            source,
            version: text("SPHINX_VERSION"),
            theme_version: text("SPHINX_RTD_THEME_VERSION"),
            args: text("SPHINX_ARGS"),
            gh_pages_dir,
        },
    );

    let publish = Toolchain::new(
        variables.flag("PUBLISH"),
        variables,
        &["TWINE_VERSION"],
        PinnedTool {
            version: variables.optional("TWINE_VERSION"),
        },
    );

    let changelog = Toolchain::new(
        variables.flag("CHANGELOG"),
        variables,
        &["CHANGELOG_VERSION"],
        PinnedTool {
            version: variables.optional("CHANGELOG_VERSION"),
        },
    );

    Toolchains {
        parallel,
        cover,
        lint,
        doc,
        publish,
        changelog,
    }
}
