//! Rule expansion: from a resolved configuration to a complete rule set.
//!
//! Expansion is pure and infallible. Each (category, runtime) pair becomes a
//! [`GeneratedRule`] made of two [`Target`]s: the install marker (a real file
//! target whose recipe provisions the environment) and the phony action that
//! depends only on that marker. Umbrella targets aggregate the actions.

pub mod actions;
pub mod command;
pub mod expand;
pub mod packages;
pub mod special;
pub mod template;
pub mod wrapper;

pub use command::CommandLine;
pub use expand::expand;
pub use template::RuleTemplate;
pub use wrapper::ExecutionWrapper;

use serde::Serialize;

use crate::config::{Category, RuntimeSpec};

/// Role of a target in the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Install marker file; the only non-phony kind.
    Marker,
    /// Per-runtime action.
    Action,
    /// Aggregate with no recipe of its own.
    Umbrella,
    /// Fixed housekeeping rule (help, clean, superclean, gh-pages).
    Utility,
}

/// A single rule: name, prerequisites in order, and recipe lines.
///
/// Recipe lines are plain shell text; escaping for make happens at render
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Target name (a file path for markers).
    pub name: String,
    /// Role of the target.
    pub kind: TargetKind,
    /// Prerequisites in declared order.
    pub prerequisites: Vec<String>,
    /// Recipe lines in order.
    pub recipe: Vec<String>,
}

impl Target {
    /// A phony aggregate of `prerequisites`.
    #[must_use]
    pub fn umbrella(name: impl Into<String>, prerequisites: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Umbrella,
            prerequisites,
            recipe: Vec::new(),
        }
    }

    /// A phony housekeeping rule.
    #[must_use]
    pub fn utility(
        name: impl Into<String>,
        prerequisites: Vec<String>,
        recipe: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Utility,
            prerequisites,
            recipe,
        }
    }

    /// Whether the target is declared `.PHONY`.
    #[must_use]
    pub fn is_phony(&self) -> bool {
        self.kind != TargetKind::Marker
    }
}

/// The install/action pair for one (category, runtime).
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRule {
    /// Category of the rule.
    pub category: Category,
    /// Runtime the rule is bound to.
    pub runtime: RuntimeSpec,
    /// Isolated environment directory.
    pub env_path: String,
    /// Marker rule provisioning the environment.
    pub install: Target,
    /// Action rule depending on the marker.
    pub action: Target,
}

impl GeneratedRule {
    /// Name of the action target.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.action.name
    }

    /// Path of the install marker.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.install.name
    }
}

/// Every rule the generated Makefile declares.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    /// Goal run by a bare `make`.
    pub default_goal: String,
    /// Usage listing.
    pub help: Target,
    /// Per (category, runtime) rules, category-major in declaration order.
    pub generated: Vec<GeneratedRule>,
    /// One umbrella per category in declaration order.
    pub meta_targets: Vec<Target>,
    /// clean, superclean, commit, gh-pages.
    pub utilities: Vec<Target>,
}

impl RuleSet {
    /// Every target in render order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        std::iter::once(&self.help)
            .chain(
                self.generated
                    .iter()
                    .flat_map(|rule| [&rule.install, &rule.action]),
            )
            .chain(&self.meta_targets)
            .chain(&self.utilities)
    }

    /// Look up a target by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Target> {
        self.targets().find(|target| target.name == name)
    }

    /// Generated rules of one category, in runtime order.
    pub fn rules_for(&self, category: Category) -> impl Iterator<Item = &GeneratedRule> {
        self.generated
            .iter()
            .filter(move |rule| rule.category == category)
    }

    /// Umbrella and utility targets a user would invoke, sorted by name.
    #[must_use]
    pub fn entry_points(&self) -> Vec<&Target> {
        let mut entries: Vec<&Target> = self.meta_targets.iter().chain(&self.utilities).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
