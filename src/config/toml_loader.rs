//! `pybuild.toml` parsing.
//!
//! The project file uses typed sections; every key maps onto one registered
//! variable (see [`super::variables::REGISTRY`]) and is applied as the
//! [`Layer::File`] layer. Unknown sections and keys are rejected by serde.
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use super::variables::{Layer, Variables, quote_word};
use crate::error::ConfigError;

/// Default project file name.
pub const PROJECT_FILE: &str = "pybuild.toml";

/// Load and deserialize a TOML file.
///
/// A missing file deserializes as empty TOML, so every section falls back to
/// its defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    if !path.exists() {
        return toml::from_str("").map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: display,
        message: e.message().to_string(),
    })
}

/// `[runtimes]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimesSection {
    /// Container images to target, in order.
    pub images: Option<Vec<String>>,
    /// Images to drop from `images`.
    pub exclude: Option<Vec<String>>,
}

/// `[execution]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionSection {
    /// Run tools on the host instead of in containers.
    pub no_docker: Option<bool>,
}

/// `[pip]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipSection {
    /// Global pip arguments.
    pub args: Option<String>,
    /// Arguments for `pip install`.
    pub install_args: Option<String>,
}

/// `[test]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSection {
    /// Extra package specifiers installed into every environment.
    pub require: Option<Vec<String>>,
    /// Test selection passed to unittest.
    pub filter: Option<String>,
    /// unittest arguments.
    pub args: Option<String>,
}

/// `[parallel]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct ParallelSection {
    pub enabled: Option<bool>,
    pub version: Option<String>,
    pub args: Option<String>,
    pub coverage_args: Option<String>,
}

/// `[cover]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct CoverSection {
    pub enabled: Option<bool>,
    pub version: Option<String>,
    pub args: Option<String>,
    pub report_args: Option<String>,
    pub all_runtimes: Option<bool>,
}

/// `[lint]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LintSection {
    pub enabled: Option<bool>,
    pub version: Option<String>,
    pub args: Option<String>,
}

/// `[doc]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocSection {
    /// Sphinx source directory; documentation is active iff non-empty.
    pub source: Option<String>,
    /// Sphinx version pin.
    pub version: Option<String>,
    /// `sphinx_rtd_theme` version pin.
    pub theme_version: Option<String>,
    /// sphinx-build arguments.
    pub args: Option<String>,
    /// Side checkout of the `gh-pages` branch.
    pub gh_pages_dir: Option<String>,
}

/// `[publish]` and `[changelog]`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct PinnedSection {
    pub enabled: Option<bool>,
    pub version: Option<String>,
}

/// Parsed `pybuild.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct ProjectFile {
    pub runtimes: RuntimesSection,
    pub execution: ExecutionSection,
    pub pip: PipSection,
    pub test: TestSection,
    pub parallel: ParallelSection,
    pub cover: CoverSection,
    pub lint: LintSection,
    pub doc: DocSection,
    pub publish: PinnedSection,
    pub changelog: PinnedSection,
}

impl ProjectFile {
    /// Flatten the file into `(variable, value)` assignments.
    ///
    /// Lists are joined with spaces and booleans written as `true`/`false`,
    /// matching how the same variables are spelled on the command line.
    /// Requirement specifiers are quoted first so each item stays a single
    /// pip argument.
    #[must_use]
    pub fn assignments(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut text = |name: &'static str, value: Option<&String>| {
            if let Some(value) = value {
                out.push((name, value.clone()));
            }
        };
        text("PIP_ARGS", self.pip.args.as_ref());
        text("PIP_INSTALL_ARGS", self.pip.install_args.as_ref());
        text("TEST", self.test.filter.as_ref());
        text("UNITTEST_ARGS", self.test.args.as_ref());
        text("UNITTEST_PARALLEL_VERSION", self.parallel.version.as_ref());
        text("UNITTEST_PARALLEL_ARGS", self.parallel.args.as_ref());
        text("UNITTEST_PARALLEL_COVERAGE_ARGS", self.parallel.coverage_args.as_ref());
        text("COVERAGE_VERSION", self.cover.version.as_ref());
        text("COVERAGE_ARGS", self.cover.args.as_ref());
        text("COVERAGE_REPORT_ARGS", self.cover.report_args.as_ref());
        text("PYLINT_VERSION", self.lint.version.as_ref());
        text("PYLINT_ARGS", self.lint.args.as_ref());
        text("SPHINX_DOC", self.doc.source.as_ref());
        text("SPHINX_VERSION", self.doc.version.as_ref());
        text("SPHINX_RTD_THEME_VERSION", self.doc.theme_version.as_ref());
        text("SPHINX_ARGS", self.doc.args.as_ref());
        text("GH_PAGES_DIR", self.doc.gh_pages_dir.as_ref());
        text("TWINE_VERSION", self.publish.version.as_ref());
        text("CHANGELOG_VERSION", self.changelog.version.as_ref());

        let lists = [
            ("PYTHON_IMAGES", &self.runtimes.images),
            ("PYTHON_IMAGES_EXCLUDE", &self.runtimes.exclude),
        ];
        for (name, value) in lists {
            if let Some(items) = value {
                out.push((name, items.join(" ")));
            }
        }
        if let Some(specs) = &self.test.require {
            let quoted: Vec<String> = specs.iter().map(String::as_str).map(quote_word).collect();
            out.push(("TESTS_REQUIRE", quoted.join(" ")));
        }

        let flags = [
            ("NO_DOCKER", self.execution.no_docker),
            ("UNITTEST_PARALLEL", self.parallel.enabled),
            ("COVERAGE", self.cover.enabled),
            ("COVERAGE_ALL_RUNTIMES", self.cover.all_runtimes),
            ("PYLINT", self.lint.enabled),
            ("PUBLISH", self.publish.enabled),
            ("CHANGELOG", self.changelog.enabled),
        ];
        for (name, value) in flags {
            if let Some(flag) = value {
                out.push((name, flag.to_string()));
            }
        }
        out
    }

    /// Apply this file as the [`Layer::File`] layer.
    ///
    /// # Errors
    ///
    /// Returns an error if an assignment is rejected by the registry.
    pub fn apply(&self, variables: &mut Variables) -> Result<(), ConfigError> {
        for (name, value) in self.assignments() {
            variables.set(name, &value, Layer::File)?;
        }
        Ok(())
    }
}
