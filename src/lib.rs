//! Multi-runtime Python build Makefile generator.
//!
//! Reads a declarative project configuration (built-in defaults,
//! `pybuild.toml`, `PYBUILD_*` environment variables, `--set` overrides) and
//! emits a Makefile whose targets provision one isolated environment per
//! (category, runtime) pair and run the category's tool inside it.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: layer variables and resolve them into a [`config::ResolvedConfig`]
//! - **[`rules`]**: expand a resolved configuration into a [`rules::RuleSet`]
//! - **[`render`]**: serialize a rule set as Makefile text
//! - **[`plan`]**: dry-run a rule set the way `make -n` would
//! - **[`commands`]**: top-level subcommand orchestration (`generate`, `check`, `dump`, ...)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod render;
pub mod rules;
