//! Persistence of the last selected language
//!
//! The flipbook remembers one value across sessions: the language the reader
//! picked last. [`FilePreferenceStore`] keeps it in a small TOML file,
//! [`MemoryPreferenceStore`] keeps it for the lifetime of the process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::LanguageCode;

/// Where the selected language is read from at startup and written to after
/// every successful switch
pub trait PreferenceStore {
    fn load(&self) -> TranslationResult<Option<LanguageCode>>;

    fn save(&self, language: &LanguageCode) -> TranslationResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(rename = "preferredLanguage", skip_serializing_if = "Option::is_none")]
    preferred_language: Option<LanguageCode>,
}

/// TOML file holding the `preferredLanguage` key
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> TranslationResult<Option<LanguageCode>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            TranslationError::PreferenceError(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let stored: StoredPreferences = toml::from_str(&content).map_err(|e| {
            TranslationError::PreferenceError(format!("invalid {}: {}", self.path.display(), e))
        })?;

        Ok(stored
            .preferred_language
            .filter(|language| !language.as_str().is_empty()))
    }

    fn save(&self, language: &LanguageCode) -> TranslationResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TranslationError::PreferenceError(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = toml::to_string(&StoredPreferences {
            preferred_language: Some(language.clone()),
        })?;
        fs::write(&self.path, content).map_err(|e| {
            TranslationError::PreferenceError(format!("cannot write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("Stored preferred language {} in {}", language, self.path.display());
        Ok(())
    }
}

/// Process-local preference, used when nothing should touch the disk
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    language: Mutex<Option<LanguageCode>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: &str) -> Self {
        Self {
            language: Mutex::new(Some(LanguageCode::new(language))),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> TranslationResult<Option<LanguageCode>> {
        self.language
            .lock()
            .map(|language| language.clone())
            .map_err(|e| TranslationError::PreferenceError(e.to_string()))
    }

    fn save(&self, language: &LanguageCode) -> TranslationResult<()> {
        let mut stored = self
            .language
            .lock()
            .map_err(|e| TranslationError::PreferenceError(e.to_string()))?;
        *stored = Some(language.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("preferences.toml"));

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn saved_language_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");
        let store = FilePreferenceStore::new(&path);

        store.save(&LanguageCode::new("es")).unwrap();

        assert_eq!(store.load().unwrap(), Some(LanguageCode::new("es")));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("preferredLanguage = \"es\""));
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "preferredLanguage = [").unwrap();

        assert!(FilePreferenceStore::new(&path).load().is_err());
    }

    #[test]
    fn memory_store_keeps_last_value() {
        let store = MemoryPreferenceStore::with_language("fr");
        store.save(&LanguageCode::new("de")).unwrap();

        assert_eq!(store.load().unwrap(), Some(LanguageCode::new("de")));
    }
}
