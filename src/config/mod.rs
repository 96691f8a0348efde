use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::scoring::ScoringConfig;

/// Get the config directory path (~/.config/pillar-score/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("pillar-score"))
}

/// Get the default config file path (~/.config/pillar-score/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load the scoring configuration.
///
/// # Arguments
///
/// * `path` - Optional path to a config file. If None, the default path is
///   tried and the built-in rule library is used when no file exists there.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<ScoringConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => match get_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => {
                debug!("no config file found, using built-in rule library");
                Ok(ScoringConfig::default())
            }
        },
    }
}

fn read_config(path: &Path) -> Result<ScoringConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: ScoringConfig = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    debug!(
        path = %path.display(),
        rule_sets = config.rule_sets.len(),
        "loaded config"
    );
    Ok(config)
}
