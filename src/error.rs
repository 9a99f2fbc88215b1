//! Domain-specific error types for the build file generator.
//!
//! Internal modules return typed errors ([`ConfigError`], [`PlanError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PybuildError
//! ├── Config(ConfigError): variable layering, validation, pybuild.toml
//! └── Plan(PlanError):     dry-run planning against a generated rule set
//! ```
//!
//! Rule expansion and rendering are infallible: every configuration problem
//! is reported by the resolver before a single rule is emitted.

use thiserror::Error;

/// Top-level error type for the generator.
#[derive(Error, Debug)]
pub enum PybuildError {
    /// Configuration-related error (unknown variable, invalid value, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dry-run planning error.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),
}

/// Errors that arise while loading, layering, and resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable name is not part of the configuration schema.
    #[error("unknown variable '{name}' (from {layer})")]
    UnknownVariable {
        /// The offending variable name.
        name: String,
        /// Where the variable came from (e.g. `--set`, `pybuild.toml`).
        layer: String,
    },

    /// A variable from the older version-keyed schema was supplied.
    #[error("variable '{name}' is no longer supported: {hint}")]
    LegacyVariable {
        /// The legacy variable name.
        name: String,
        /// How to express the same setting in the current schema.
        hint: String,
    },

    /// A variable carries a value that cannot be used.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// The variable the value was assigned to.
        variable: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Two settings contradict each other.
    #[error("conflicting configuration in {variable}: {message}")]
    Contradiction {
        /// The variable at the centre of the conflict.
        variable: String,
        /// Human-readable description of the conflict.
        message: String,
    },

    /// A `--set` argument is not of the form `NAME=VALUE`.
    #[error("malformed assignment '{0}': expected NAME=VALUE")]
    MalformedAssignment(String),

    /// The project file contains a syntax or schema error.
    #[error("invalid config file {path}: {message}")]
    Parse {
        /// Path to the config file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while planning goals against a rule set.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The goal names no generated target and no existing file.
    #[error("no rule to make target '{0}'")]
    UnknownTarget(String),
}
