//! Optional toolchain configuration.
//!
//! Each toolchain is a [`Toolchain`] wrapping its fully defaulted settings
//! together with an [`Activation`] state. Settings never contain holes: an
//! overridden toolchain still falls back to the built-in default for every
//! field the user left alone.
use serde::Serialize;

use super::category::Category;
use super::variables::Variables;

/// Tri-state activation of an optional toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    /// The toolchain emits no rules.
    Disabled,
    /// Active with every setting at its default.
    Defaults,
    /// Active with at least one setting overridden.
    Overridden,
}

impl Activation {
    /// Lowercase name used in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Defaults => "defaults",
            Self::Overridden => "overridden",
        }
    }
}

/// An optional toolchain with its resolved settings.
#[derive(Debug, Clone, Serialize)]
pub struct Toolchain<T> {
    /// Activation state.
    pub activation: Activation,
    /// Settings with defaults applied.
    pub settings: T,
}

impl<T> Toolchain<T> {
    /// Build a toolchain from its enable state and override variable names.
    pub fn new(active: bool, variables: &Variables, overrides: &[&str], settings: T) -> Self {
        let activation = if !active {
            Activation::Disabled
        } else if overrides.iter().any(|name| variables.is_overridden(name)) {
            Activation::Overridden
        } else {
            Activation::Defaults
        };
        Self {
            activation,
            settings,
        }
    }

    /// Whether the toolchain emits rules.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activation != Activation::Disabled
    }
}

/// unittest-parallel runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParallelSettings {
    /// `unittest-parallel` version pin.
    pub version: String,
    /// Runner arguments.
    pub args: String,
    /// Runner arguments used for coverage runs.
    pub coverage_args: String,
}

impl ParallelSettings {
    /// Variables that override this toolchain.
    pub const OVERRIDES: &'static [&'static str] = &[
        "UNITTEST_PARALLEL_VERSION",
        "UNITTEST_PARALLEL_ARGS",
        "UNITTEST_PARALLEL_COVERAGE_ARGS",
    ];
}

/// coverage.py.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverSettings {
    /// `coverage` version pin.
    pub version: String,
    /// `coverage run` arguments.
    pub args: String,
    /// `coverage report` arguments.
    pub report_args: String,
    /// Run coverage on every runtime rather than the first.
    pub all_runtimes: bool,
}

impl CoverSettings {
    /// Variables that override this toolchain.
    pub const OVERRIDES: &'static [&'static str] = &[
        "COVERAGE_VERSION",
        "COVERAGE_ARGS",
        "COVERAGE_REPORT_ARGS",
        "COVERAGE_ALL_RUNTIMES",
    ];
}

/// pylint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintSettings {
    /// `pylint` version pin.
    pub version: String,
    /// pylint arguments.
    pub args: String,
}

impl LintSettings {
    /// Variables that override this toolchain.
    pub const OVERRIDES: &'static [&'static str] = &["PYLINT_VERSION", "PYLINT_ARGS"];
}

/// Sphinx documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocSettings {
    /// Source directory; empty when documentation is disabled.
    pub source: String,
    /// `sphinx` version pin.
    pub version: String,
    /// `sphinx_rtd_theme` version pin.
    pub theme_version: String,
    /// sphinx-build arguments.
    pub args: String,
    /// Side checkout used by `gh-pages`.
    pub gh_pages_dir: String,
}

impl DocSettings {
    /// Variables that override this toolchain.
    pub const OVERRIDES: &'static [&'static str] = &[
        "SPHINX_VERSION",
        "SPHINX_RTD_THEME_VERSION",
        "SPHINX_ARGS",
        "GH_PAGES_DIR",
    ];
}

/// A tool installed by name with an optional version pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinnedTool {
    /// Version pin; unpinned when `None`.
    pub version: Option<String>,
}

/// Every optional toolchain.
#[derive(Debug, Clone, Serialize)]
pub struct Toolchains {
    /// Parallel test runner (changes the test and cover actions).
    pub parallel: Toolchain<ParallelSettings>,
    /// Coverage.
    pub cover: Toolchain<CoverSettings>,
    /// Lint.
    pub lint: Toolchain<LintSettings>,
    /// Documentation.
    pub doc: Toolchain<DocSettings>,
    /// Packaging and upload (twine).
    pub publish: Toolchain<PinnedTool>,
    /// Changelog (simple-git-changelog).
    pub changelog: Toolchain<PinnedTool>,
}

impl Toolchains {
    /// Whether `category` emits rules. Tests are always active.
    #[must_use]
    pub fn is_active(&self, category: Category) -> bool {
        match category {
            Category::Test => true,
            Category::Cover => self.cover.is_active(),
            Category::Lint => self.lint.is_active(),
            Category::Doc => self.doc.is_active(),
            Category::Publish => self.publish.is_active(),
            Category::Changelog => self.changelog.is_active(),
        }
    }

    /// Activation state of `category`'s toolchain.
    #[must_use]
    pub fn activation(&self, category: Category) -> Activation {
        match category {
            Category::Test => Activation::Defaults,
            Category::Cover => self.cover.activation,
            Category::Lint => self.lint.activation,
            Category::Doc => self.doc.activation,
            Category::Publish => self.publish.activation,
            Category::Changelog => self.changelog.activation,
        }
    }
}
