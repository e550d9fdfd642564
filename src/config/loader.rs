//! Config file loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::TrackerConfig;

/// Load the tracker config.
///
/// An explicitly supplied path must parse; an auto-discovered file that
/// fails to parse is warned about and replaced with the built-in defaults.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<TrackerConfig> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(TrackerConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    match toml::from_str::<TrackerConfig>(&content)
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
    {
        Ok(config) => Ok(config),
        Err(err) => {
            if explicit {
                return Err(err);
            }
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {}",
                config_file.display(),
                err
            );
            Ok(TrackerConfig::default())
        }
    }
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    ["mesh-recon.toml", ".mesh-recon.toml"]
        .iter()
        .map(|candidate| search_dir.join(candidate))
        .find(|path| path.exists())
}
