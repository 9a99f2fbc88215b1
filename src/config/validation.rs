use super::resolve::{Execution, ResolvedConfig};
use super::toolchain::{CoverSettings, DocSettings, LintSettings, ParallelSettings};
use super::variables::Variables;

/// A validation warning detected after resolution.
///
/// Warnings never stop generation; hard errors are raised by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The variable the warning is about (e.g. "PYTHON_IMAGES_EXCLUDE").
    pub source: String,
    /// The specific entry or value that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
///
/// Implementations look for settings that are legal but probably not what
/// the user meant:
/// - Exclusions that match nothing
/// - Overrides for toolchains that will never run
/// - Missing external tools
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationWarning>;
}

/// Flags exclusion entries that match no configured image.
#[derive(Debug)]
pub struct ExclusionValidator<'a> {
    variables: &'a Variables,
}

impl<'a> ExclusionValidator<'a> {
    #[must_use]
    pub const fn new(variables: &'a Variables) -> Self {
        Self { variables }
    }
}

impl ConfigValidator for ExclusionValidator<'_> {
    fn validate(&self, _config: &ResolvedConfig) -> Vec<ValidationWarning> {
        let images = self.variables.words("PYTHON_IMAGES");
        self.variables
            .words("PYTHON_IMAGES_EXCLUDE")
            .into_iter()
            .filter(|excluded| {
                // An empty image list means the default image.
                if images.is_empty() {
                    excluded != super::runtime::DEFAULT_IMAGE
                } else {
                    !images.contains(excluded)
                }
            })
            .map(|excluded| {
                ValidationWarning::new(
                    "PYTHON_IMAGES_EXCLUDE",
                    excluded,
                    "does not match any configured image",
                )
            })
            .collect()
    }
}

/// Flags overrides supplied for a toolchain that is disabled.
#[derive(Debug)]
pub struct DisabledOverrideValidator<'a> {
    variables: &'a Variables,
}

impl<'a> DisabledOverrideValidator<'a> {
    #[must_use]
    pub const fn new(variables: &'a Variables) -> Self {
        Self { variables }
    }

    fn check(
        &self,
        active: bool,
        toolchain: &str,
        overrides: &[&str],
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if active {
            return;
        }
        for name in overrides {
            if self.variables.is_overridden(name) {
                warnings.push(ValidationWarning::new(
                    *name,
                    self.variables.text(name),
                    format!(
                        "{toolchain} is disabled; override from {} has no effect",
                        self.variables.layer(name)
                    ),
                ));
            }
        }
    }
}

impl ConfigValidator for DisabledOverrideValidator<'_> {
    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationWarning> {
        let t = &config.toolchains;
        let mut warnings = Vec::new();
        self.check(
            t.parallel.is_active(),
            "unittest-parallel",
            ParallelSettings::OVERRIDES,
            &mut warnings,
        );
        self.check(t.cover.is_active(), "coverage", CoverSettings::OVERRIDES, &mut warnings);
        self.check(t.lint.is_active(), "pylint", LintSettings::OVERRIDES, &mut warnings);
        self.check(
            t.doc.is_active(),
            "documentation (SPHINX_DOC is empty)",
            DocSettings::OVERRIDES,
            &mut warnings,
        );
        self.check(t.publish.is_active(), "publish", &["TWINE_VERSION"], &mut warnings);
        self.check(
            t.changelog.is_active(),
            "changelog",
            &["CHANGELOG_VERSION"],
            &mut warnings,
        );
        warnings
    }
}

/// Flags container mode when no `docker` binary can be found.
#[derive(Debug)]
pub struct DockerValidator {
    docker_on_path: bool,
}

impl DockerValidator {
    /// Probe `PATH` for a `docker` executable.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(which::which("docker").is_ok())
    }

    #[must_use]
    pub const fn new(docker_on_path: bool) -> Self {
        Self { docker_on_path }
    }
}

impl ConfigValidator for DockerValidator {
    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationWarning> {
        if config.execution == Execution::Container && !self.docker_on_path {
            vec![ValidationWarning::new(
                "NO_DOCKER",
                "docker",
                "container mode selected but docker was not found on PATH; set NO_DOCKER=1 to run on the host",
            )]
        } else {
            Vec::new()
        }
    }
}

/// Run every validator and collect their warnings in order.
#[must_use]
pub fn validate_all(
    variables: &Variables,
    config: &ResolvedConfig,
    docker: &DockerValidator,
) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 3] = [
        &ExclusionValidator::new(variables),
        &DisabledOverrideValidator::new(variables),
        docker,
    ];
    validators
        .iter()
        .flat_map(|validator| validator.validate(config))
        .collect()
}
