use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "search-cli")]
#[command(about = "Type-ahead search over metric metadata that publishes dashboard variables")]
pub struct Cli {
    /// Directory holding base.yaml, <environment>.yaml and the fixtures
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read search input line by line from stdin (default)
    Run,
    /// Resolve a single input and print the candidates
    Query { input: String },
    /// Print the query the panel options build
    Preview,
    /// Validate the panel options
    Check,
}
