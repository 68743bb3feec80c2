//! Keel CLI - Command-line interface for the Keel template linter

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{rules, schema, validate};
use config::OutputFormat;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keel")]
#[command(about = "Validate infrastructure templates against property constraints", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate templates against constraint schemas
    Validate {
        /// Template files to validate
        #[arg(required = true)]
        templates: Vec<String>,

        /// Schema directories (each containing constraints/*.toml); repeatable
        #[arg(long)]
        schemas: Vec<String>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Rule ids to skip; repeatable
        #[arg(long = "ignore-rule")]
        ignore_rules: Vec<String>,

        /// Path to a keel.toml config file
        #[arg(long)]
        config: Option<String>,
    },

    /// List the registered rules
    Rules,

    /// Show the constraint set for a resource type
    Schema {
        /// Resource type (e.g., "AWS::Lambda::Function")
        resource_type: String,

        /// Path to schemas directory
        #[arg(long, default_value = "schemas")]
        schemas: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate {
            templates,
            schemas,
            format,
            ignore_rules,
            config,
        } => validate::run(validate::ValidateArgs {
            templates,
            schemas,
            format,
            ignore_rules,
            config,
        }),
        Commands::Rules => rules::run(),
        Commands::Schema {
            resource_type,
            schemas,
        } => schema::run(&resource_type, &schemas),
    }
}
