//! Build action categories and their runtime binding.
use serde::Serialize;
use std::fmt;

/// A class of build action with its own install/action rule pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Unit test runner, one instance per runtime.
    Test,
    /// Coverage run and report.
    Cover,
    /// Static analysis.
    Lint,
    /// Documentation build.
    Doc,
    /// Source distribution packaging and upload.
    Publish,
    /// Changelog generation.
    Changelog,
}

impl Category {
    /// Every category in declaration order.
    ///
    /// Rules and umbrella targets are emitted in this order.
    pub const ALL: [Self; 6] = [
        Self::Test,
        Self::Cover,
        Self::Lint,
        Self::Doc,
        Self::Publish,
        Self::Changelog,
    ];

    /// Categories chained by the `commit` umbrella, in their fixed order.
    pub const COMMIT: [Self; 4] = [Self::Test, Self::Lint, Self::Cover, Self::Doc];

    /// Target-name prefix for this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Cover => "cover",
            Self::Lint => "lint",
            Self::Doc => "doc",
            Self::Publish => "publish",
            Self::Changelog => "changelog",
        }
    }

    /// How many runtimes this category binds to.
    ///
    /// `cover_all_runtimes` promotes coverage from single- to multi-instance.
    #[must_use]
    pub const fn binding(self, cover_all_runtimes: bool) -> Binding {
        match self {
            Self::Test => Binding::Every,
            Self::Cover if cover_all_runtimes => Binding::Every,
            _ => Binding::First,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime binding of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// One rule per resolved runtime, in resolved order.
    Every,
    /// Exactly one rule, bound to the first resolved runtime.
    First,
}

impl Binding {
    /// Select the runtimes a category binds to.
    #[must_use]
    pub fn select<T>(self, runtimes: &[T]) -> &[T] {
        match self {
            Self::Every => runtimes,
            Self::First => runtimes.get(..1).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_stable() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["test", "cover", "lint", "doc", "publish", "changelog"]
        );
    }

    #[test]
    fn commit_order_runs_lint_before_cover() {
        assert_eq!(
            Category::COMMIT,
            [Category::Test, Category::Lint, Category::Cover, Category::Doc]
        );
    }

    #[test]
    fn test_binds_every_runtime() {
        assert_eq!(Category::Test.binding(false), Binding::Every);
    }

    #[test]
    fn cover_binding_follows_flag() {
        assert_eq!(Category::Cover.binding(false), Binding::First);
        assert_eq!(Category::Cover.binding(true), Binding::Every);
    }

    #[test]
    fn single_instance_categories_ignore_cover_flag() {
        for category in [
            Category::Lint,
            Category::Doc,
            Category::Publish,
            Category::Changelog,
        ] {
            assert_eq!(category.binding(true), Binding::First, "{category}");
        }
    }

    #[test]
    fn first_binding_selects_only_the_head() {
        let runtimes = ["a", "b", "c"];
        assert_eq!(Binding::First.select(&runtimes), &["a"]);
        assert_eq!(Binding::Every.select(&runtimes), &["a", "b", "c"]);
    }

    #[test]
    fn first_binding_of_empty_list_is_empty() {
        let runtimes: [&str; 0] = [];
        assert!(Binding::First.select(&runtimes).is_empty());
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Category::Changelog.to_string(), "changelog");
    }
}
