mod cmd;
mod output;
mod root;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use shopgen_core::types::PolicyVariant;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shopgen",
    about = "Synthetic e-commerce data generator: simulate daily order volume and populate a shop database",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: nearest shopgen.yaml walking up from the cwd)
    #[arg(long, global = true, env = "SHOPGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default shopgen.yaml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Simulate orders over a date range and print them
    Orders {
        /// Simulate the N days before today (default: generation.days)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        days: Option<u32>,

        /// First simulated date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Date after the last simulated one (YYYY-MM-DD, exclusive)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Seed for reproducible output (default: generation.seed, else entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Volume policy variant: simple or rich
        #[arg(long)]
        variant: Option<PolicyVariant>,
    },

    /// Generate the full shop dataset and write it to the configured database
    Populate {
        /// Seed for reproducible data (default: generation.seed, else entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Delete existing rows before writing
        #[arg(long)]
        replace: bool,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Populate { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Init { force } => cmd::init::run(&config_path, force, cli.json),
        Commands::Orders {
            days,
            from,
            to,
            seed,
            variant,
        } => {
            let window = match (from, to) {
                (Some(from), Some(to)) => cmd::orders::Window::Between(from, to),
                _ => cmd::orders::Window::LastDays(days),
            };
            cmd::orders::run(&config_path, window, seed, variant, cli.json)
        }
        Commands::Populate { seed, replace } => {
            cmd::populate::run(&config_path, seed, replace, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
