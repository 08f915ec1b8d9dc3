use anyhow::Result;
use edgecap::application::language::LanguagePreferenceService;
use edgecap::domain::language::Language;
use edgecap::domain::ports::LanguageStore;
use edgecap::infrastructure::JsonLanguageStore;
use edgecap::infrastructure::i18n::I18nService;
use std::sync::Arc;

#[test]
fn test_preference_survives_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let first = LanguagePreferenceService::new(Arc::new(JsonLanguageStore::new(dir.path())?));
    assert_eq!(first.current(["en-GB"]), Language::En);
    first.set(Language::Nl)?;

    // A fresh store over the same directory sees the stored choice
    let second = LanguagePreferenceService::new(Arc::new(JsonLanguageStore::new(dir.path())?));
    assert_eq!(second.current(["en-GB"]), Language::Nl);

    let i18n = I18nService::new(second.current(["en-GB"]));
    assert_eq!(i18n.t("fund.since_inception"), "Sinds oprichting");
    Ok(())
}

#[test]
fn test_unreadable_preference_falls_back_to_detection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = JsonLanguageStore::new(dir.path())?;
    std::fs::write(store.path(), r#"{"preferredLanguage": "fr"}"#)?;
    assert!(store.load().is_err());

    let service = LanguagePreferenceService::new(Arc::new(store));
    assert_eq!(service.current(["nl-BE", "en"]), Language::Nl);
    assert_eq!(service.current(["de-DE"]), Language::En);
    Ok(())
}

#[test]
fn test_switching_language_in_place() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let service = LanguagePreferenceService::new(Arc::new(JsonLanguageStore::new(dir.path())?));
    let mut i18n = I18nService::new(service.current(["en-US"]));
    assert_eq!(i18n.tf("language.current", &[("language", "en")]), "Language: en");

    service.set(Language::Nl)?;
    i18n.set_language(Language::Nl);
    assert_eq!(
        i18n.tf("language.saved", &[("language", "nl")]),
        "Taal ingesteld op nl"
    );

    let natives: Vec<_> = i18n
        .available_languages()
        .iter()
        .map(|l| (l.code.clone(), l.native_name.clone()))
        .collect();
    assert_eq!(natives.len(), 2);
    assert_eq!(natives[1].0, "nl");
    assert_eq!(service.current(["en-US"]), Language::Nl);
    Ok(())
}
