//! Execution wrapper: the sandbox prefix in front of environment commands.
use super::command::CommandLine;
use crate::config::RuntimeSpec;

/// Container invocation that maps the caller's user and working directory.
pub const DOCKER_RUN: &str = "docker run -i --rm -u `id -u`:`id -g` -v `pwd`:`pwd` -w `pwd`";

/// Prefix for commands that run inside a runtime's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionWrapper {
    image: Option<String>,
}

impl ExecutionWrapper {
    /// Wrapper for `runtime`; empty for the host runtime.
    #[must_use]
    pub fn for_runtime(runtime: &RuntimeSpec) -> Self {
        Self {
            image: runtime.image().map(ToString::to_string),
        }
    }

    /// The full prefix text, or the empty string in direct mode.
    #[must_use]
    pub fn prefix(&self) -> String {
        self.image
            .as_ref()
            .map_or_else(String::new, |image| format!("{DOCKER_RUN} {image}"))
    }

    /// Start a command line carrying this prefix.
    #[must_use]
    pub fn command(&self) -> CommandLine {
        CommandLine::new().arg(self.prefix())
    }

    /// Pull the image unless it is already present; `None` in direct mode.
    #[must_use]
    pub fn pull_guard(&self) -> Option<String> {
        self.image.as_ref().map(|image| {
            format!(
                "if [ \"$(docker images -q {image})\" = \"\" ]; then docker pull -q {image}; fi"
            )
        })
    }
}
