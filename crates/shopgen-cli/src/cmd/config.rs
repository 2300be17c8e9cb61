use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use shopgen_core::config::{redact_url, Config, WarnLevel};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults filled in, password hidden)
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Print the database connection URL
    Url {
        /// Print the password instead of ***
        #[arg(long)]
        reveal: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config_path: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config_path, json),
        ConfigSubcommand::Validate => validate(config_path, json),
        ConfigSubcommand::Url { reveal } => url(config_path, reveal, json),
    }
}

fn load(config_path: &Path) -> anyhow::Result<Config> {
    Config::load(config_path).with_context(|| format!("failed to load {}", config_path.display()))
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let mut config = load(config_path)?;
    config.database = config.database.with_process_env();
    if !config.database.password.is_empty() {
        config.database.password = "***".to_string();
    }
    config.database.url = config.database.url.as_deref().map(redact_url);

    if json {
        print_json(&config)?;
    } else {
        println!("# {}", config_path.display());
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(config_path)?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// url
// ---------------------------------------------------------------------------

fn url(config_path: &Path, reveal: bool, json: bool) -> anyhow::Result<()> {
    let database = load(config_path)?.database.with_process_env();
    let url = if reveal {
        database.url()
    } else {
        database.redacted_url()
    };

    if json {
        print_json(&serde_json::json!({ "url": url }))?;
    } else {
        println!("{url}");
    }
    Ok(())
}
