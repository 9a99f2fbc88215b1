pub mod category;
pub mod resolve;
pub mod runtime;
pub mod toml_loader;
pub mod toolchain;
pub mod validation;
pub mod variables;

pub use category::Category;
pub use resolve::{Execution, ResolvedConfig, resolve};
pub use runtime::RuntimeSpec;
pub use toml_loader::ProjectFile;
pub use variables::{Layer, Variables};

use crate::error::ConfigError;

/// Stack every configuration layer above the built-in defaults.
///
/// Layers are applied lowest precedence first: the project file, then
/// `PYBUILD_*` entries from `env`, then `--set` assignments.
///
/// # Errors
///
/// Returns the first error raised by any layer; the message names the
/// offending variable and the layer it came from.
pub fn layer_variables<I, K, V, S>(
    file: &ProjectFile,
    env: I,
    assignments: &[S],
) -> Result<Variables, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    S: AsRef<str>,
{
    let mut variables = Variables::defaults();
    file.apply(&mut variables)?;
    variables.apply_env(env)?;
    variables.apply_assignments(assignments)?;
    Ok(variables)
}
