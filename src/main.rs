use std::process::ExitCode;

use clap::{CommandFactory as _, Parser as _};

use pybuild::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    let result = match args.command {
        cli::Command::Generate(opts) => commands::generate::run(&args.global, &opts, &log),
        cli::Command::Check(opts) => commands::check::run(&args.global, &opts, &log),
        cli::Command::Dump(opts) => commands::dump::run(&args.global, &opts, &log),
        cli::Command::Plan(opts) => commands::plan::run(&args.global, &opts, &log),
        cli::Command::Targets => commands::targets::run(&args.global, &log),
        cli::Command::Completions(opts) => {
            clap_complete::generate(
                opts.shell,
                &mut cli::Cli::command(),
                "pybuild",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            let warnings = log.warning_count();
            if warnings > 0 {
                log.info(&format!("finished with {warnings} warning(s)"));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
