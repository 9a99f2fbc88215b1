// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed Python project and a fluent builder
// so each integration test can set up an isolated project without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pybuild::cli::GlobalOpts;
use pybuild::commands::CommandSetup;
use pybuild::config::toml_loader::PROJECT_FILE;
use pybuild::logging::Logger;
use pybuild::rules::{RuleSet, expand};

/// Write the minimal layout of a Python project into `root`.
///
/// Creates:
/// - `setup.py`: placeholder package script
/// - `src/tests/`: test discovery root
pub fn setup_minimal_project(root: &Path) {
    std::fs::create_dir_all(root.join("src").join("tests")).expect("create src/tests");
    std::fs::write(root.join("setup.py"), "from setuptools import setup\nsetup()\n")
        .expect("write setup.py");
}

/// An isolated test project backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing the test project.
    pub root: tempfile::TempDir,
    /// `--set` assignments applied on top of the project file.
    pub set: Vec<String>,
    /// Environment snapshot handed to the resolver.
    pub env: Vec<(String, String)>,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal project and no configuration.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_minimal_project(root.path());
        Self {
            root,
            set: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Global CLI options pointing at this project.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            directory: Some(self.root.path().to_path_buf()),
            config: None,
            set: self.set.clone(),
        }
    }

    /// Run the shared command setup against this project.
    pub fn try_setup(&self) -> anyhow::Result<CommandSetup> {
        CommandSetup::init(&self.global(), self.env.clone(), &Logger::new())
    }

    /// Run the shared command setup, panicking on failure.
    pub fn setup(&self) -> CommandSetup {
        self.try_setup().expect("command setup")
    }

    /// Expand the project's configuration into a rule set.
    pub fn rules(&self) -> RuleSet {
        expand(&self.setup().config)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the project before the context is
/// finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal project.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` as the project's `pybuild.toml`.
    pub fn with_project_file(self, content: &str) -> Self {
        std::fs::write(self.ctx.path(PROJECT_FILE), content).expect("write pybuild.toml");
        self
    }

    /// Add a `--set NAME=VALUE` assignment.
    pub fn with_set(mut self, assignment: &str) -> Self {
        self.ctx.set.push(assignment.to_string());
        self
    }

    /// Add an environment variable to the snapshot.
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.ctx.env.push((name.to_string(), value.to_string()));
        self
    }

    /// Create an (empty) file at `relative`, e.g. an install marker.
    pub fn with_file(self, relative: &str) -> Self {
        let path = self.ctx.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, "").expect("write file");
        self
    }

    /// Finalise and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
