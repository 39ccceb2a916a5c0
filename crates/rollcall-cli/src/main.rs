//! Rollcall CLI - reconcile personnel records against reference rosters.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input,
            references,
            sheet,
            config,
            output,
            format,
            on_collision,
            json,
        } => commands::run::run(commands::run::RunArgs {
            input,
            references,
            sheet,
            config,
            output,
            format,
            on_collision,
            json,
        }),

        Commands::References { dir, config, json } => {
            commands::references::run(dir, config, json, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rollcall=debug" } else { "rollcall=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
