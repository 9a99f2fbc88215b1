//! Makefile rendering.
//!
//! The rendered text is a pure function of the [`RuleSet`]: identical rule
//! sets produce byte-identical Makefiles.
use crate::rules::{RuleSet, Target};

/// First line of every generated Makefile.
pub const HEADER: &str = "# This file was generated by pybuild. Do not edit.";

const REGENERATE: &str = "# Regenerate with `pybuild generate`; configure in pybuild.toml.";

/// Whether `text` starts with the generated-file header.
#[must_use]
pub fn is_generated(text: &str) -> bool {
    text.lines().next().is_some_and(|line| line == HEADER)
}

/// Escape shell text for a make recipe.
///
/// ```
/// use pybuild::render::escape;
///
/// assert_eq!(escape("rm $(find src)"), "rm $$(find src)");
/// ```
#[must_use]
pub fn escape(line: &str) -> String {
    line.replace('$', "$$")
}

/// Render `rules` as Makefile text.
#[must_use]
pub fn render(rules: &RuleSet) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(REGENERATE);
    out.push_str("\n\n");
    out.push_str(".DEFAULT_GOAL := ");
    out.push_str(&rules.default_goal);
    out.push('\n');
    for target in rules.targets() {
        out.push('\n');
        write_target(&mut out, target);
    }
    out
}

fn write_target(out: &mut String, target: &Target) {
    if target.is_phony() {
        out.push_str(".PHONY: ");
        out.push_str(&target.name);
        out.push('\n');
    }
    out.push_str(&target.name);
    out.push(':');
    for prerequisite in &target.prerequisites {
        out.push(' ');
        out.push_str(prerequisite);
    }
    out.push('\n');
    for line in &target.recipe {
        out.push('\t');
        out.push_str(&escape(line));
        out.push('\n');
    }
}
