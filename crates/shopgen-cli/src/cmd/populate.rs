use crate::output::{print_json, print_table};
use anyhow::Context;
use shopgen_core::config::{Config, WarnLevel};
use shopgen_core::daterange::SystemClock;
use shopgen_core::random::RngSource;
use shopgen_core::shop::ShopGenerator;
use shopgen_core::store::{DatabaseTarget, ShopStore};
use shopgen_core::types::Table;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub fn run(config_path: &Path, seed: Option<u64>, replace: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let warnings = config.validate();
    for w in warnings.iter().filter(|w| w.level == WarnLevel::Warning) {
        warn!("{}", w.message);
    }
    let errors: Vec<&str> = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message.as_str())
        .collect();
    if !errors.is_empty() {
        anyhow::bail!("invalid config: {}", errors.join("; "));
    }

    let database = config.database.with_process_env();
    let url = database.url();
    let target = DatabaseTarget::from_url(&url)
        .with_context(|| format!("cannot open {}", database.redacted_url()))?;

    let mut store = ShopStore::open(&target)
        .with_context(|| format!("failed to open {}", database.redacted_url()))?;
    if !store.is_empty()? {
        if !replace {
            anyhow::bail!(
                "{} already holds shop data; pass --replace to clear it first",
                database.redacted_url()
            );
        }
        store.clear().context("failed to clear existing rows")?;
    }

    let seed = seed.or(config.generation.seed);
    info!(url = %database.redacted_url(), ?seed, "populating");
    let mut source = RngSource::from_seed_opt(seed);
    let dataset = ShopGenerator::new(&config)?
        .generate(&SystemClock, &mut source)
        .context("failed to generate shop data")?;
    store
        .write_dataset(&dataset)
        .context("failed to write shop data")?;

    let mut counts = BTreeMap::new();
    for table in Table::all() {
        counts.insert(table.as_str(), store.count(*table)?);
    }

    if json {
        print_json(&serde_json::json!({
            "database": database.redacted_url(),
            "tables": counts,
        }))?;
        return Ok(());
    }

    println!("Populated {}", database.redacted_url());
    let rows = Table::all()
        .iter()
        .map(|t| vec![t.as_str().to_string(), counts[t.as_str()].to_string()])
        .collect();
    print_table(&["TABLE", "ROWS"], rows);
    Ok(())
}
