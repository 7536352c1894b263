//! Geoclass CLI - soil classification from laboratory readings.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use flexi_logger::{Logger, LoggerHandle};

/// Start stderr logging; `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) -> Option<LoggerHandle> {
    let level = if verbose { "debug" } else { "warn" };
    match Logger::try_with_env_or_str(level).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Classify {
            file,
            total_mass,
            ll,
            lp,
            mct,
            config,
            json,
            output,
        } => commands::classify::run(
            commands::classify::ClassifyArgs {
                file,
                total_mass,
                ll,
                lp,
                mct,
                config,
                json,
                output,
            },
            cli.verbose,
        ),

        Commands::Curve {
            file,
            total_mass,
            json,
        } => commands::curve::run(file, total_mass, json, cli.verbose),

        Commands::Sieves { json } => commands::sieves::run(json),

        Commands::Show { file, json } => commands::show::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
