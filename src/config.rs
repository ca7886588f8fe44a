use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where blocks land when neither the CLI nor a config file says otherwise.
pub const DEFAULT_BASE_DIR: &str = "07_TempDevGoogleSheets/googleSheets_Code";

/// Config file names looked up in the working directory, first match wins.
const CONFIG_CANDIDATES: &[&str] = &["md2files.yml", "md2files.yaml"];

/// Config for optional YAML (`md2files.yml` / `md2files.yaml`)
#[derive(Debug, Default, Deserialize)]
pub struct Md2filesConfig {
    /// Root directory that block paths are resolved against.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

/// Attempt to load config from `dir`, returning None if no candidate file exists.
pub fn load_config_file(dir: &Path) -> Result<Option<Md2filesConfig>> {
    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Md2filesConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid config in {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}

/// CLI flag beats config file beats the built-in default.
pub fn resolve_base_dir(cli: Option<PathBuf>, config: Option<&Md2filesConfig>) -> PathBuf {
    cli.or_else(|| config.and_then(|c| c.base_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR))
}
