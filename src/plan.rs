//! Dry-run planning over a rule set.
//!
//! Mirrors what `make -n <goal>...` would print for the generated Makefile
//! without running anything: goals are walked depth-first with
//! prerequisites in declared order, each target is considered at most once
//! per invocation, and install markers that already exist on disk are
//! treated as up to date.
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::PlanError;
use crate::rules::{RuleSet, Target};

/// Answers whether a file target already exists.
///
/// Production code uses [`FsProbe`]; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait MarkerProbe {
    /// Returns `true` if `path` (relative to the project) exists.
    fn exists(&self, path: &str) -> bool;
}

/// [`MarkerProbe`] backed by the filesystem under a project root.
#[derive(Debug, Clone)]
pub struct FsProbe {
    root: PathBuf,
}

impl FsProbe {
    /// Probe paths relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MarkerProbe for FsProbe {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}

/// Commands one goal would run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalPlan {
    /// Goal as given.
    pub goal: String,
    /// Shell commands in execution order.
    pub commands: Vec<String>,
}

impl GoalPlan {
    /// Whether the goal has nothing left to do.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Plan for a whole invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Per-goal plans in the order the goals were given.
    pub goals: Vec<GoalPlan>,
}

impl Plan {
    /// Every command of the invocation, in order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.goals
            .iter()
            .flat_map(|goal| goal.commands.iter().map(String::as_str))
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for goal in &self.goals {
            if goal.is_up_to_date() {
                writeln!(f, "nothing to be done for '{}'", goal.goal)?;
            }
            for command in &goal.commands {
                writeln!(f, "{command}")?;
            }
        }
        Ok(())
    }
}

/// Plan `goals` against `rules`, probing marker files through `probe`.
///
/// # Errors
///
/// Returns [`PlanError::UnknownTarget`] if a goal or prerequisite has no
/// rule and no file of that name exists.
pub fn plan<S: AsRef<str>>(
    rules: &RuleSet,
    goals: &[S],
    probe: &dyn MarkerProbe,
) -> Result<Plan, PlanError> {
    let mut walker = Walker {
        rules,
        probe,
        visited: HashSet::new(),
    };
    let goals = goals
        .iter()
        .map(|goal| {
            let goal = goal.as_ref();
            let mut commands = Vec::new();
            walker.visit(goal, &mut commands)?;
            Ok(GoalPlan {
                goal: goal.to_string(),
                commands,
            })
        })
        .collect::<Result<_, PlanError>>()?;
    Ok(Plan { goals })
}

struct Walker<'a> {
    rules: &'a RuleSet,
    probe: &'a dyn MarkerProbe,
    visited: HashSet<String>,
}

impl Walker<'_> {
    /// Returns whether the target ran any command.
    fn visit(&mut self, name: &str, commands: &mut Vec<String>) -> Result<bool, PlanError> {
        if !self.visited.insert(name.to_string()) {
            return Ok(false);
        }
        let Some(target) = self.rules.find(name) else {
            if self.probe.exists(name) {
                return Ok(false);
            }
            return Err(PlanError::UnknownTarget(name.to_string()));
        };

        let mut prerequisites_ran = false;
        for prerequisite in &target.prerequisites {
            prerequisites_ran |= self.visit(prerequisite, commands)?;
        }

        if !self.needs_recipe(target, prerequisites_ran) {
            return Ok(false);
        }
        commands.extend(target.recipe.iter().cloned());
        Ok(prerequisites_ran || !target.recipe.is_empty())
    }

    fn needs_recipe(&self, target: &Target, prerequisites_ran: bool) -> bool {
        target.is_phony() || prerequisites_ran || !self.probe.exists(&target.name)
    }
}
