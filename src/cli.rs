use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the Makefile generator.
#[derive(Parser, Debug)]
#[command(
    name = "pybuild",
    about = "Generate multi-runtime Python build Makefiles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Project file (defaults to pybuild.toml in the project directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override a variable, e.g. --set PYTHON_IMAGES="python:3.9 python:3.8"
    #[arg(long = "set", value_name = "VAR=VALUE", global = true)]
    pub set: Vec<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the Makefile
    Generate(GenerateOpts),
    /// Fail if the Makefile on disk is out of date
    Check(CheckOpts),
    /// Print the fully expanded rule set
    Dump(DumpOpts),
    /// Show the commands `make` would run for the given goals
    Plan(PlanOpts),
    /// List umbrella targets and their constituents
    Targets,
    /// Print a shell completion script
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `generate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GenerateOpts {
    /// Output path, relative to the project directory
    #[arg(short, long, default_value = "Makefile")]
    pub output: PathBuf,

    /// Overwrite a file that was not generated by pybuild
    #[arg(long)]
    pub force: bool,
}

/// Options for the `check` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CheckOpts {
    /// Makefile to compare, relative to the project directory
    #[arg(short, long, default_value = "Makefile")]
    pub output: PathBuf,
}

/// Output format of `dump`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    /// Makefile text
    #[default]
    Make,
    /// Resolved configuration and rule set as JSON
    Json,
}

/// Options for the `dump` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DumpOpts {
    /// Output format
    #[arg(long, value_enum, default_value_t = DumpFormat::Make)]
    pub format: DumpFormat,
}

/// Options for the `plan` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PlanOpts {
    /// Goals to plan (defaults to the Makefile's default goal)
    pub goals: Vec<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
