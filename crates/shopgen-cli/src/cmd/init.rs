use crate::output::print_json;
use anyhow::Context;
use shopgen_core::config::Config;
use std::path::Path;

pub fn run(config_path: &Path, force: bool, json: bool) -> anyhow::Result<()> {
    let existed = config_path.exists();
    let written = !existed || force;

    if written {
        Config::default()
            .save(config_path)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    if json {
        print_json(&serde_json::json!({
            "path": config_path.display().to_string(),
            "written": written,
            "existed": existed,
        }))?;
        return Ok(());
    }

    match (existed, written) {
        (false, _) => println!("  created: {}", config_path.display()),
        (true, true) => println!("  replaced: {}", config_path.display()),
        (true, false) => {
            println!("  exists:  {}", config_path.display());
            println!("Use --force to overwrite it with defaults.");
        }
    }
    if written {
        println!("Next: shopgen populate");
    }
    Ok(())
}
