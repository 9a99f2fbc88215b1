//! Command: print version information.

/// Version string stamped at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PYBUILD_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the pybuild version to stdout.
pub fn run() {
    println!("pybuild {}", version());
}
