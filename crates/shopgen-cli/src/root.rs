use shopgen_core::config::CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the config file path.
///
/// Priority:
/// 1. `--config` flag / `SHOPGEN_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `shopgen.yaml`
/// 3. Fall back to `cwd/shopgen.yaml`
pub fn resolve_config(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_from(explicit, &cwd)
}

fn resolve_config_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let mut dir = cwd.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return candidate;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    cwd.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "version: 1").unwrap();
        let explicit = dir.path().join("other.yaml");
        let result = resolve_config_from(Some(&explicit), dir.path());
        assert_eq!(result, explicit);
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "version: 1").unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        let result = resolve_config_from(None, &subdir);
        assert_eq!(result, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn falls_back_to_cwd() {
        let dir = TempDir::new().unwrap();
        let result = resolve_config_from(None, dir.path());
        assert_eq!(result, dir.path().join(CONFIG_FILE));
    }
}
