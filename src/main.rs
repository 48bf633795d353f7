use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use envclass::cli::{self, Cli, Commands};

fn main() {
    let args = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &args.command {
        Commands::Resolve { env, json } => cli::commands::resolve::execute(&args.schema, env, *json),
        Commands::Check => cli::commands::check::execute(&args.schema),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
