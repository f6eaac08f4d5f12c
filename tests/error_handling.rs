//! 错误处理测试
//!
//! Configuration and storage problems surface as errors; translation
//! problems never do.

use std::sync::Arc;
use std::time::Duration;

use flipbook_translator::translation::{
    ConfigManager, ErrorSeverity, FilePreferenceStore, IgnoreReason, LanguageChange,
    LocalDictionary, MemoryPreferenceStore, PreferenceStore, RemoteTranslationClient,
    TranslationConfig, TranslationCoordinator, TranslationEndpoint, TranslationError,
};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{coordinator_with, test_config, FailingEndpoint, HtmlTestHelper};

#[test]
fn test_invalid_configuration_is_rejected() {
    let config = TranslationConfig {
        batch_size: 500,
        ..test_config(10)
    };
    let result = TranslationCoordinator::new(
        &config,
        Arc::new(LocalDictionary::empty()),
        RemoteTranslationClient::with_endpoints(Vec::new(), Duration::from_secs(1)),
        Box::new(MemoryPreferenceStore::new()),
    );

    match result {
        Err(error) => {
            assert!(matches!(error, TranslationError::ConfigError(_)));
            assert_eq!(error.severity(), ErrorSeverity::Critical);
        }
        Ok(_) => panic!("batch size 500 should be rejected"),
    }
}

#[test]
fn test_config_file_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flipbook.toml");
    std::fs::write(&path, "batch_size = \"many\"").unwrap();

    let error = ConfigManager::from_path(&path).unwrap_err();
    assert!(error.to_string().contains("flipbook.toml"), "{error}");

    let missing = ConfigManager::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, TranslationError::ConfigError(_)));
}

#[test]
fn test_json_config_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flipbook.json");
    std::fs::write(
        &path,
        r#"{ "default_language": "en", "primary_endpoint": "http://localhost:5000/translate" }"#,
    )
    .unwrap();

    let config = ConfigManager::from_path(&path).unwrap().into_config();
    assert_eq!(config.default_language, "en");
    assert_eq!(config.endpoint_urls().unwrap()[0].port(), Some(5000));
}

#[test]
fn test_broken_dictionary_falls_back_to_next_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    let valid = dir.path().join("valid.json");
    std::fs::write(&broken, "{ not json").unwrap();
    std::fs::write(&valid, common::DICTIONARY).unwrap();

    assert!(matches!(
        LocalDictionary::from_path(&broken),
        Err(TranslationError::DictionaryError(_))
    ));

    let dictionary = LocalDictionary::load(&[dir.path().join("missing.json"), broken, valid]);
    assert!(!dictionary.is_empty());

    let nothing = LocalDictionary::load(&[dir.path().join("missing.json")]);
    assert!(nothing.is_empty());
}

#[test]
fn test_unreadable_preferences_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    std::fs::write(&path, "preferredLanguage = [").unwrap();

    let store = FilePreferenceStore::new(&path);
    assert!(matches!(store.load(), Err(TranslationError::PreferenceError(_))));
    assert_eq!(FilePreferenceStore::new(dir.path().join("none.toml")).load().unwrap(), None);
}

#[tokio::test]
async fn test_restore_ignores_corrupt_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    std::fs::write(&path, "preferredLanguage = [").unwrap();

    let coordinator = common::coordinator_with_store(
        Vec::new(),
        10,
        Box::new(FilePreferenceStore::new(&path)),
    );
    let dom = HtmlTestHelper::parse(common::FLIPBOOK_PAGE);

    assert_eq!(
        coordinator.restore_preferred_language(&dom.document).await,
        LanguageChange::Ignored(IgnoreReason::NoStoredPreference)
    );
    assert_eq!(coordinator.current_language().as_str(), "fr");
}

#[tokio::test]
async fn test_unsupported_language_leaves_page_alone() {
    let failing = Arc::new(FailingEndpoint::new("down"));
    let coordinator = coordinator_with(vec![failing.clone() as Arc<dyn TranslationEndpoint>], 10);
    let dom = HtmlTestHelper::parse(common::FLIPBOOK_PAGE);

    assert_eq!(
        coordinator.change_language(&dom.document, "ja").await,
        LanguageChange::Ignored(IgnoreReason::Unsupported)
    );
    assert_eq!(failing.calls(), 0);
    assert_eq!(HtmlTestHelper::text_of(&dom.document, "welcome"), "Bienvenue à bord");
    assert!(coordinator.set_current_language("ja").is_err());
    assert!(coordinator.set_current_language("EN").is_ok());
    assert_eq!(coordinator.current_language().as_str(), "en");
}

#[test]
fn test_endpoint_failures_are_classified() {
    let timeout = TranslationError::TimeoutError {
        endpoint: "https://libretranslate.com/translate".to_string(),
        timeout: Duration::from_secs(10),
    };
    assert!(timeout.is_endpoint_failure());
    assert_eq!(timeout.severity(), ErrorSeverity::Warning);

    let exhausted = TranslationError::AllEndpointsFailed {
        attempts: 4,
        last: "HTTP 503".to_string(),
    };
    assert!(!exhausted.is_endpoint_failure());
    assert!(exhausted.severity() > ErrorSeverity::Warning);
    assert_eq!(
        exhausted.to_string(),
        "all 4 translation endpoints failed, last error: HTTP 503"
    );
}
