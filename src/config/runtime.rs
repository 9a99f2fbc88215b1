//! Runtime identifiers, slugs, and runtime list resolution.
use serde::Serialize;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Image used when no runtime is configured.
pub const DEFAULT_IMAGE: &str = "python:3";

/// Slug of the single host runtime used in direct mode.
pub const HOST_SLUG: &str = "no-docker";

/// Characters that would break the generated shell text or target names.
const FORBIDDEN: &[char] = &['"', '\'', '`', '$', '\\'];

/// A resolved target runtime.
///
/// Immutable once resolved: every per-runtime path and command fragment is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSpec {
    id: String,
    slug: String,
    image: Option<String>,
}

impl RuntimeSpec {
    /// Create a containerized runtime from an image identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the identifier is empty or
    /// contains whitespace, quotes, `$`, backslash, or backtick.
    pub fn from_image(id: &str) -> Result<Self, ConfigError> {
        validate_id(id)?;
        Ok(Self {
            id: id.to_string(),
            slug: slugify(id),
            image: Some(id.to_string()),
        })
    }

    /// The host runtime used when containers are disabled.
    #[must_use]
    pub fn host() -> Self {
        Self {
            id: HOST_SLUG.to_string(),
            slug: HOST_SLUG.to_string(),
            image: None,
        }
    }

    /// Runtime identifier as configured.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Target- and path-safe form of the identifier.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Container image, or `None` for the host runtime.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Map every character outside `[A-Za-z0-9_-]` to `-`.
///
/// ```
/// use pybuild::config::runtime::slugify;
///
/// assert_eq!(slugify("python:3.10-rc"), "python-3-10-rc");
/// ```
#[must_use]
pub fn slugify(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn validate_id(id: &str) -> Result<(), ConfigError> {
    let reason = if id.is_empty() {
        Some("runtime identifier is empty")
    } else if id.chars().any(char::is_whitespace) {
        Some("runtime identifier contains whitespace")
    } else if id.contains(FORBIDDEN) {
        Some("runtime identifier contains a quote, '$', '\\' or '`'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidValue {
            variable: "PYTHON_IMAGES".to_string(),
            value: id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Resolve the ordered runtime list.
///
/// Applies the default image when `images` is empty, removes every excluded
/// identifier, and deduplicates keeping the first occurrence. The result may
/// be empty when the exclusions remove everything.
///
/// # Errors
///
/// Returns an error if an identifier is invalid or two distinct identifiers
/// share a slug.
pub fn resolve_runtimes(
    images: &[String],
    exclude: &[String],
) -> Result<Vec<RuntimeSpec>, ConfigError> {
    let default = [DEFAULT_IMAGE.to_string()];
    let images = if images.is_empty() { &default[..] } else { images };

    let mut resolved: Vec<RuntimeSpec> = Vec::new();
    let mut slugs: HashMap<String, String> = HashMap::new();
    for id in images {
        let spec = RuntimeSpec::from_image(id)?;
        if exclude.contains(id) || resolved.iter().any(|r| r.id == spec.id) {
            continue;
        }
        if let Some(existing) = slugs.get(spec.slug()) {
            return Err(ConfigError::Contradiction {
                variable: "PYTHON_IMAGES".to_string(),
                message: format!(
                    "'{existing}' and '{id}' both map to target suffix '{}'",
                    spec.slug()
                ),
            });
        }
        slugs.insert(spec.slug.clone(), spec.id.clone());
        resolved.push(spec);
    }
    Ok(resolved)
}
