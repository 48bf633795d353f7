pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::schema::DEFAULT_SCHEMA_FILE;

/// Typed configuration from the environment and `.env` files.
#[derive(Parser, Debug)]
#[command(name = "envclass", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Schema file declaring the environments
    #[arg(long, global = true, env = "ENVCLASS_SCHEMA", default_value = DEFAULT_SCHEMA_FILE)]
    pub schema: PathBuf,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one environment and print its values
    Resolve {
        /// Environment to resolve
        #[arg(long, env = "ENVIRONMENT")]
        env: String,

        /// Print the values as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Resolve every declared environment and report failures
    Check,
}
