//! Local storage locations: the preference directory and an optional
//! chart catalogue override.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorageEnvConfig {
    /// Directory holding the language preference file
    pub home: PathBuf,
    /// TOML file replacing the built-in chart catalogue
    pub catalogue_path: Option<PathBuf>,
}

impl StorageEnvConfig {
    pub fn from_env() -> Result<Self> {
        let home = match env::var("EDGECAP_HOME") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => {
                let home = env::var("HOME").context("Could not find HOME directory")?;
                PathBuf::from(home).join(".edgecap")
            }
        };

        let catalogue_path = env::var("SERIES_CATALOGUE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            home,
            catalogue_path,
        })
    }
}
