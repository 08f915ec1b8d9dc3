use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site language. English unless the visitor prefers Dutch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }

    /// Pick a language from an ordered list of locale tags
    /// (`["nl-NL", "en-US"]`, `["en_GB.UTF-8"]`, ...): any Dutch tag wins.
    pub fn detect<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dutch = tags
            .into_iter()
            .any(|tag| tag.as_ref().trim().to_lowercase().starts_with("nl"));
        if dutch { Self::Nl } else { Self::En }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "nl" => Ok(Self::Nl),
            _ => anyhow::bail!("Unsupported language: {}. Must be 'en' or 'nl'", s),
        }
    }
}

/// Stored choice wins; otherwise fall back to detection.
pub fn resolve_language<I, S>(stored: Option<Language>, tags: I) -> Language
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    stored.unwrap_or_else(|| Language::detect(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Language::detect(["en-US", "nl-BE"]), Language::Nl);
        assert_eq!(Language::detect(["NL"]), Language::Nl);
        assert_eq!(Language::detect(["de-DE", "en"]), Language::En);
        assert_eq!(Language::detect(Vec::<String>::new()), Language::En);
    }

    #[test]
    fn test_stored_preference_wins() {
        assert_eq!(resolve_language(Some(Language::En), ["nl-NL"]), Language::En);
        assert_eq!(resolve_language(None, ["nl-NL"]), Language::Nl);
    }

    #[test]
    fn test_parse() {
        assert_eq!("NL".parse::<Language>().unwrap(), Language::Nl);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(serde_json::to_string(&Language::Nl).unwrap(), "\"nl\"");
    }
}
