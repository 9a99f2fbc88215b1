//! Shell command line assembly.

/// Builder for a single shell command line.
///
/// Parts are joined with single spaces; empty or blank parts are dropped so
/// that an unset argument slot never leaves a doubled space behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    parts: Vec<String>,
}

impl CommandLine {
    /// Start an empty command line.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append one part (which may itself contain several words).
    #[must_use]
    pub fn arg(mut self, part: impl AsRef<str>) -> Self {
        let part = part.as_ref().trim();
        if !part.is_empty() {
            self.parts.push(part.to_string());
        }
        self
    }

    /// Append several parts.
    #[must_use]
    pub fn args<I, S>(self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parts.into_iter().fold(self, |cmd, part| cmd.arg(part))
    }

    /// Finish the command line.
    #[must_use]
    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}
