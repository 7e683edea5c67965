//! Configuration module for readme-searcher
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "README_SEARCHER_SETTINGS_PATH";

/// Load settings from an explicit path, the well-known locations, or defaults.
///
/// A `.env` file in the working directory is read first so its values are
/// visible to the environment overrides.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    if let Some(path) = explicit {
        return load_from(path);
    }

    // Check environment variable first
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return load_from(&path);
        }
    }

    for path in default_paths() {
        if path.exists() {
            return load_from(&path);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

fn load_from(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    let mut settings = Settings::from_file(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    settings.merge_env();
    Ok(settings)
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("readme-searcher/settings.yml"));
    }
    paths
}
