use crate::domain::language::Language;
use crate::domain::ports::LanguageStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedPreferences {
    preferred_language: Language,
}

/// Language preference kept in `preferences.json` under the edgecap home
pub struct JsonLanguageStore {
    file_path: PathBuf,
}

impl JsonLanguageStore {
    pub fn new(home: &Path) -> Result<Self> {
        if !home.exists() {
            fs::create_dir_all(home).context("Failed to create preferences directory")?;
        }

        Ok(Self {
            file_path: home.join("preferences.json"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl LanguageStore for JsonLanguageStore {
    fn load(&self) -> Result<Option<Language>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read preferences file")?;
        let prefs: PersistedPreferences =
            serde_json::from_str(&content).context("Failed to parse preferences JSON")?;

        info!("Loaded language preference from {:?}", self.file_path);
        Ok(Some(prefs.preferred_language))
    }

    fn save(&self, language: Language) -> Result<()> {
        let prefs = PersistedPreferences {
            preferred_language: language,
        };
        let content =
            serde_json::to_string_pretty(&prefs).context("Failed to serialize preferences")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp preferences file")?;
        fs::rename(&temp_path, &self.file_path).context("Failed to rename preferences file")?;

        info!("Saved language preference {} to {:?}", language, self.file_path);
        Ok(())
    }
}
