//! Package specifiers installed into each category's environment.
use crate::config::{Category, ResolvedConfig};

/// `name=="version"`; the quotes survive into the recipe and are removed by
/// the shell.
#[must_use]
pub fn pin(name: &str, version: &str) -> String {
    format!("{name}==\"{version}\"")
}

/// `name`, pinned when `version` is set.
#[must_use]
pub fn maybe_pin(name: &str, version: Option<&str>) -> String {
    version.map_or_else(|| name.to_string(), |v| pin(name, v))
}

/// Packages for `category`'s install rule, in install order.
#[must_use]
pub fn packages(category: Category, config: &ResolvedConfig) -> Vec<String> {
    let t = &config.toolchains;
    let parallel = t
        .parallel
        .is_active()
        .then(|| pin("unittest-parallel", &t.parallel.settings.version));

    let mut out: Vec<String> = match category {
        Category::Test => vec![Some("-e .".to_string()), parallel]
            .into_iter()
            .flatten()
            .collect(),
        Category::Cover => vec![
            Some("-e .".to_string()),
            Some(pin("coverage", &t.cover.settings.version)),
            parallel,
        ]
        .into_iter()
        .flatten()
        .collect(),
        Category::Lint => vec!["-e .".to_string(), pin("pylint", &t.lint.settings.version)],
        Category::Doc => vec![
            "-e .".to_string(),
            pin("sphinx", &t.doc.settings.version),
            pin("sphinx_rtd_theme", &t.doc.settings.theme_version),
        ],
        Category::Publish => {
            return vec![maybe_pin("twine", t.publish.settings.version.as_deref())];
        }
        Category::Changelog => {
            return vec![maybe_pin(
                "simple-git-changelog",
                t.changelog.settings.version.as_deref(),
            )];
        }
    };
    out.extend(config.test.require.clone());
    out
}
