use crate::domain::language::{Language, resolve_language};
use crate::domain::ports::LanguageStore;
use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

/// Locale variables consulted for detection, most specific first
const LOCALE_VARS: [&str; 4] = ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Locale tags from the environment. `LANGUAGE` may hold a `:`-separated list.
pub fn system_locale_tags() -> Vec<String> {
    LOCALE_VARS
        .iter()
        .filter_map(|key| env::var(key).ok())
        .flat_map(|value| {
            value
                .split(':')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub struct LanguagePreferenceService {
    store: Arc<dyn LanguageStore>,
}

impl LanguagePreferenceService {
    pub fn new(store: Arc<dyn LanguageStore>) -> Self {
        Self { store }
    }

    /// Stored choice if any, else detected from `tags`. An unreadable
    /// preference counts as no preference.
    pub fn current<I, S>(&self, tags: I) -> Language
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stored = self.store.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable language preference: {:#}", e);
            None
        });
        resolve_language(stored, tags)
    }

    pub fn set(&self, language: Language) -> Result<()> {
        self.store.save(language)?;
        info!("Language preference set to {}", language);
        Ok(())
    }
}
