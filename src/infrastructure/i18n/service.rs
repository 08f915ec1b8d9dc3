use crate::domain::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

const EN_JSON: &str = include_str!("../../../translations/en.json");
const NL_JSON: &str = include_str!("../../../translations/nl.json");

/// Language metadata loaded from JSON
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

/// Translation data loaded from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationData {
    pub language: LanguageInfo,
    pub ui: HashMap<String, String>,
}

/// Internationalization service over the embedded translation tables
pub struct I18nService {
    current_language: Language,
    translations: HashMap<Language, TranslationData>,
}

impl I18nService {
    pub fn new(language: Language) -> Self {
        let mut translations = HashMap::new();
        for (lang, json) in [(Language::En, EN_JSON), (Language::Nl, NL_JSON)] {
            match serde_json::from_str::<TranslationData>(json) {
                Ok(data) => {
                    translations.insert(lang, data);
                }
                Err(e) => warn!("Skipping {} translations: {}", lang, e),
            }
        }

        Self {
            current_language: language,
            translations,
        }
    }

    /// Get list of all available languages, sorted by code
    pub fn available_languages(&self) -> Vec<&LanguageInfo> {
        let mut languages: Vec<_> = self.translations.values().map(|d| &d.language).collect();
        languages.sort_by(|a, b| a.code.cmp(&b.code));
        languages
    }

    pub fn set_language(&mut self, language: Language) {
        self.current_language = language;
    }

    pub fn language(&self) -> Language {
        self.current_language
    }

    /// Translate a UI key, falling back to the key itself
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations
            .get(&self.current_language)
            .and_then(|data| data.ui.get(key))
            .map(|s| s.as_str())
            .unwrap_or(key)
    }

    /// Translate with format parameters
    /// Usage: i18n.tf("stats.as_of", &[("date", "31.12.2025")])
    /// Template in JSON: "As of {date}"
    pub fn tf(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut result = self.t(key).to_string();
        for (name, value) in params {
            result = result.replace(&format!("{{{}}}", name), value);
        }
        result
    }
}

impl Default for I18nService {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
