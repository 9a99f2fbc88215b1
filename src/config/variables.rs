//! Variable registry and layered assignment.
//!
//! Every configuration layer (built-in defaults, `pybuild.toml`, `PYBUILD_*`
//! environment variables, `--set` assignments) writes into the same
//! [`Variables`] table through [`Variables::set`], which rejects names that
//! are not part of the registry. Higher layers simply overwrite lower ones,
//! so the caller applies layers in precedence order.
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "PYBUILD_";

/// Environment names under [`ENV_PREFIX`] that are not configuration.
const RESERVED_ENV: &[&str] = &["PYBUILD_VERSION"];

/// Value shape of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Free-form shell text.
    Text,
    /// Whitespace-separated list.
    List,
    /// Boolean toggle.
    Bool,
}

/// A registered configuration variable.
#[derive(Debug)]
pub struct VariableDef {
    /// Canonical variable name.
    pub name: &'static str,
    /// Value shape.
    pub kind: Kind,
    /// Built-in default.
    pub default: &'static str,
    /// Dotted `section.key` location in `pybuild.toml`.
    pub location: &'static str,
}

macro_rules! registry {
    ($($name:literal : $kind:ident = $default:literal @ $location:literal),+ $(,)?) => {
        /// Every known variable.
        pub const REGISTRY: &[VariableDef] = &[
            $(VariableDef {
                name: $name,
                kind: Kind::$kind,
                default: $default,
                location: $location,
            }),+
        ];
    };
}

registry! {
    "PYTHON_IMAGES": List = "python:3" @ "runtimes.images",
    "PYTHON_IMAGES_EXCLUDE": List = "" @ "runtimes.exclude",
    "NO_DOCKER": Bool = "" @ "execution.no_docker",
    "PIP_ARGS": Text = "--no-cache-dir --disable-pip-version-check" @ "pip.args",
    "PIP_INSTALL_ARGS": Text = "--progress-bar off" @ "pip.install_args",
    "TESTS_REQUIRE": Text = "" @ "test.require",
    "TEST": Text = "" @ "test.filter",
    "UNITTEST_ARGS": Text = "-v" @ "test.args",
    "UNITTEST_PARALLEL": Bool = "" @ "parallel.enabled",
    "UNITTEST_PARALLEL_VERSION": Text = "1.6.1" @ "parallel.version",
    "UNITTEST_PARALLEL_ARGS": Text = "-v" @ "parallel.args",
    "UNITTEST_PARALLEL_COVERAGE_ARGS": Text = "--coverage-branch --coverage-fail-under 100" @ "parallel.coverage_args",
    "COVERAGE": Bool = "true" @ "cover.enabled",
    "COVERAGE_VERSION": Text = "7.6.1" @ "cover.version",
    "COVERAGE_ARGS": Text = "--branch" @ "cover.args",
    "COVERAGE_REPORT_ARGS": Text = "--fail-under 100" @ "cover.report_args",
    "COVERAGE_ALL_RUNTIMES": Bool = "" @ "cover.all_runtimes",
    "PYLINT": Bool = "true" @ "lint.enabled",
    "PYLINT_VERSION": Text = "3.2.7" @ "lint.version",
    "PYLINT_ARGS": Text = "-j 0" @ "lint.args",
    "SPHINX_DOC": Text = "" @ "doc.source",
    "SPHINX_VERSION": Text = "7.4.7" @ "doc.version",
    "SPHINX_RTD_THEME_VERSION": Text = "2.0.0" @ "doc.theme_version",
    "SPHINX_ARGS": Text = "-W -a" @ "doc.args",
    "GH_PAGES_DIR": Text = "" @ "doc.gh_pages_dir",
    "PUBLISH": Bool = "true" @ "publish.enabled",
    "TWINE_VERSION": Text = "" @ "publish.version",
    "CHANGELOG": Bool = "true" @ "changelog.enabled",
    "CHANGELOG_VERSION": Text = "" @ "changelog.version",
}

/// Characters that split or reinterpret a bare word in a recipe shell.
const SHELL_SPECIAL: &[char] = &[
    ' ', '\t', '<', '>', '|', '&', ';', '(', ')', '*', '?', '[', ']', '{', '}', '~', '!', '#',
    '$', '`', '\\',
];

/// Quote a word when the recipe shell would otherwise split or reinterpret it.
///
/// Words that already start with a quote are taken as written.
///
/// ```
/// use pybuild::config::variables::quote_word;
///
/// assert_eq!(quote_word("requests"), "requests");
/// assert_eq!(quote_word("foobar >= 1.0"), "\"foobar >= 1.0\"");
/// ```
#[must_use]
pub fn quote_word(word: &str) -> String {
    let already_quoted = word.starts_with('"') || word.starts_with('\'');
    if already_quoted || !word.contains(SHELL_SPECIAL) {
        word.to_string()
    } else if word.contains(['"', '$', '`', '\\']) {
        format!("'{word}'")
    } else {
        format!("\"{word}\"")
    }
}

/// Look up a registered variable by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static VariableDef> {
    REGISTRY.iter().find(|def| def.name == name)
}

/// Parse a boolean variable value.
///
/// Accepts `1/0/true/false/yes/no/on/off` in any case; the empty string is
/// `false`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming `variable` for anything else.
pub fn parse_bool(variable: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable: variable.to_string(),
            value: value.to_string(),
            reason: "expected a boolean (1/0, true/false, yes/no, on/off)".to_string(),
        }),
    }
}

/// Configuration layer a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// Built-in default.
    Default,
    /// The project file.
    File,
    /// A `PYBUILD_*` environment variable.
    Environment,
    /// A `--set` command-line assignment.
    CommandLine,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "defaults",
            Self::File => "pybuild.toml",
            Self::Environment => "environment",
            Self::CommandLine => "--set",
        })
    }
}

/// A variable value together with the layer that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Raw value text.
    pub value: String,
    /// Supplying layer.
    pub layer: Layer,
}

/// The layered variable table.
#[derive(Debug, Clone)]
pub struct Variables {
    values: BTreeMap<&'static str, Assignment>,
}

impl Default for Variables {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Variables {
    /// A table holding every registered variable at its built-in default.
    #[must_use]
    pub fn defaults() -> Self {
        let values = REGISTRY
            .iter()
            .map(|def| {
                (
                    def.name,
                    Assignment {
                        value: def.default.to_string(),
                        layer: Layer::Default,
                    },
                )
            })
            .collect();
        Self { values }
    }

    /// Assign `value` to `name` from `layer`, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or legacy, or if a boolean
    /// value cannot be parsed.
    pub fn set(&mut self, name: &str, value: &str, layer: Layer) -> Result<(), ConfigError> {
        let Some(def) = lookup(name) else {
            return Err(unknown_variable(name, value, layer));
        };
        if def.kind == Kind::Bool {
            parse_bool(def.name, value)?;
        }
        self.values.insert(
            def.name,
            Assignment {
                value: value.to_string(),
                layer,
            },
        );
        Ok(())
    }

    /// Apply `PYBUILD_<NAME>` variables from an environment snapshot.
    ///
    /// Entries without the prefix are ignored. The snapshot is passed in so
    /// that resolution never reads the process environment itself.
    ///
    /// # Errors
    ///
    /// Returns the first assignment error.
    pub fn apply_env<I, K, V>(&mut self, env: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: Vec<(String, String)> = env
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.as_ref();
                if RESERVED_ENV.contains(&key) {
                    return None;
                }
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_string(), value.as_ref().to_string()))
            })
            .collect();
        // Environment iteration order is unspecified.
        entries.sort();
        for (name, value) in entries {
            self.set(&name, &value, Layer::Environment)?;
        }
        Ok(())
    }

    /// Apply `NAME=VALUE` command-line assignments in order.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed assignment or an unknown variable.
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<(), ConfigError> {
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let Some((name, value)) = assignment.split_once('=') else {
                return Err(ConfigError::MalformedAssignment(assignment.to_string()));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::MalformedAssignment(assignment.to_string()));
            }
            self.set(name, value, Layer::CommandLine)?;
        }
        Ok(())
    }

    /// Raw value of a registered variable (trimmed).
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.values.get(name).map_or("", |a| a.value.trim())
    }

    /// Value as an optional string; `None` when empty.
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Value split on whitespace.
    #[must_use]
    pub fn words(&self, name: &str) -> Vec<String> {
        self.text(name)
            .split_whitespace()
            .map(ToString::to_string)
            .collect()
    }

    /// Value of a boolean variable.
    ///
    /// Values were checked on assignment, so an unparseable value cannot
    /// reach this point.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        parse_bool(name, self.text(name)).unwrap_or(false)
    }

    /// Layer that supplied the current value.
    #[must_use]
    pub fn layer(&self, name: &str) -> Layer {
        self.values.get(name).map_or(Layer::Default, |a| a.layer)
    }

    /// Whether any layer above the defaults supplied this variable.
    #[must_use]
    pub fn is_overridden(&self, name: &str) -> bool {
        self.layer(name) != Layer::Default
    }

    /// Iterate over every variable in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Assignment)> {
        self.values.iter().map(|(name, assignment)| (*name, assignment))
    }
}

fn unknown_variable(name: &str, value: &str, layer: Layer) -> ConfigError {
    match name {
        "PYTHON_VERSIONS" | "PYTHON_VERSIONS_EXCLUDE" => {
            let replacement = name.replace("VERSIONS", "IMAGES");
            let images: Vec<String> = value
                .split_whitespace()
                .map(|v| format!("python:{v}"))
                .collect();
            ConfigError::LegacyVariable {
                name: name.to_string(),
                hint: format!(
                    "runtimes are container images now; use {replacement}=\"{}\"",
                    images.join(" ")
                ),
            }
        }
        _ => ConfigError::UnknownVariable {
            name: name.to_string(),
            layer: layer.to_string(),
        },
    }
}
