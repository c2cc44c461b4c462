use crate::model::HostConfig;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "loopdeck";
const CONFIG_FILE: &str = "config.json";

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("LOOPDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE))
}

pub fn load_config() -> Result<HostConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(HostConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: HostConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &HostConfig) -> Result<()> {
    let root = config_root()?;
    fs::create_dir_all(&root).with_context(|| format!("failed to create {}", root.display()))?;
    let path = root.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShuffleAlgorithm;
    use tempfile::tempdir;

    // Both cases share the process-wide env var, so they run as one test.
    #[test]
    fn config_file_lifecycle() {
        let dir = tempdir().expect("tempdir");
        unsafe {
            env::set_var("LOOPDECK_CONFIG_DIR", dir.path().to_string_lossy().as_ref());
        }

        let missing = load_config().expect("defaults when absent");
        assert_eq!(missing, HostConfig::default());

        let mut config = HostConfig::default();
        config.controller.loop_at_end = false;
        config.controller.shuffle_algorithm = ShuffleAlgorithm::FisherYates;
        config.output_device = Some(String::from("pulse"));
        save_config(&config).expect("save");

        let loaded = load_config().expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: HostConfig =
            serde_json::from_str(r#"{ "controller": { "loop_at_end": false } }"#).expect("parse");
        assert!(!config.controller.loop_at_end);
        assert!(config.controller.random_order_on_start);
        assert_eq!(config.controller.shuffle_algorithm, ShuffleAlgorithm::Legacy);
        assert_eq!(config.frame_interval_ms, 33);
        assert_eq!(config.volume, 1.0);
    }
}
