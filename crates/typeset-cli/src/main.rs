//! typeset CLI - styled text rendering from the command line

use clap::Parser;

use typeset_cli::cli::{Cli, Commands};
use typeset_cli::commands;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Markup(args) => commands::markup::run(args),
    };

    if let Err(err) = result {
        log::debug!("command failed: {:?}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
