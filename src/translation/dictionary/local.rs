//! Curated phrase dictionary shipped next to the flipbook
//!
//! The file maps language → category → key → phrase:
//!
//! ```json
//! { "fr": { "ui": { "close": "Fermer" } }, "en": { "ui": { "close": "Close" } } }
//! ```
//!
//! A phrase translates to the phrase stored under the same category and key in
//! the other language's table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::LanguageCode;

type CategoryTable = BTreeMap<String, BTreeMap<String, String>>;

/// 本地词典
#[derive(Debug, Clone, Default)]
pub struct LocalDictionary {
    tables: BTreeMap<LanguageCode, CategoryTable>,
}

impl LocalDictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a dictionary document
    ///
    /// Leaves that are not strings are skipped, as are category or key levels
    /// that are not objects.
    pub fn from_json_str(content: &str) -> TranslationResult<Self> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| TranslationError::DictionaryError(format!("invalid JSON: {}", e)))?;

        let Value::Object(languages) = json else {
            return Err(TranslationError::DictionaryError(
                "top level must be an object keyed by language".to_string(),
            ));
        };

        let mut tables = BTreeMap::new();
        for (language, categories) in languages {
            let Value::Object(categories) = categories else {
                continue;
            };

            let mut table = CategoryTable::new();
            for (category, phrases) in categories {
                let Value::Object(phrases) = phrases else {
                    continue;
                };

                let phrases: BTreeMap<String, String> = phrases
                    .into_iter()
                    .filter_map(|(key, value)| match value {
                        Value::String(phrase) => Some((key, phrase)),
                        _ => None,
                    })
                    .collect();
                table.insert(category, phrases);
            }
            tables.insert(LanguageCode::new(&language), table);
        }

        Ok(Self { tables })
    }

    pub fn from_path(path: &Path) -> TranslationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::DictionaryError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Tries each candidate path in order and keeps the first that loads
    ///
    /// Every failure is logged. When no candidate loads the dictionary is
    /// empty and every lookup misses.
    pub fn load(paths: &[PathBuf]) -> Self {
        for path in paths {
            match Self::from_path(path) {
                Ok(dictionary) => {
                    tracing::info!(
                        "Loaded local dictionary from {} ({} languages)",
                        path.display(),
                        dictionary.tables.len()
                    );
                    return dictionary;
                }
                Err(e) => e.log(),
            }
        }

        tracing::warn!("No local dictionary could be loaded, continuing without one");
        Self::empty()
    }

    /// Looks up an exact phrase
    ///
    /// The source table is searched first. On a miss the search runs the
    /// other way round: `text` is matched against the target table and the
    /// source phrase stored under the same category and key is returned.
    pub fn lookup(&self, text: &str, source: &LanguageCode, target: &LanguageCode) -> Option<String> {
        let source_table = self.tables.get(source)?;
        let target_table = self.tables.get(target)?;

        if let Some(phrase) = Self::find_counterpart(text, source_table, target_table) {
            return Some(phrase.to_string());
        }

        Self::find_counterpart(text, target_table, source_table).map(str::to_string)
    }

    /// Finds `text` among the phrases of `matched` and returns the phrase
    /// stored under the same category and key in `other`
    fn find_counterpart<'a>(
        text: &str,
        matched: &CategoryTable,
        other: &'a CategoryTable,
    ) -> Option<&'a str> {
        matched.iter().find_map(|(category, phrases)| {
            let other_phrases = other.get(category)?;
            phrases
                .iter()
                .filter(|(_, phrase)| phrase.as_str() == text)
                .find_map(|(key, _)| other_phrases.get(key).map(String::as_str))
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.tables.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "fr": { "ui": { "music": "Musique", "close": "Fermer" }, "nav": { "next": "Suivant" } },
        "en": { "ui": { "music": "Music", "close": "Close" }, "nav": { "next": "Next" } },
        "es": { "ui": { "music": "Música", "broken": 42 } }
    }"#;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code)
    }

    #[test]
    fn forward_lookup_uses_matching_category_and_key() {
        let dictionary = LocalDictionary::from_json_str(SAMPLE).unwrap();

        assert_eq!(
            dictionary.lookup("Fermer", &lang("fr"), &lang("en")).as_deref(),
            Some("Close")
        );
        assert_eq!(
            dictionary.lookup("Suivant", &lang("fr"), &lang("en")).as_deref(),
            Some("Next")
        );
    }

    #[test]
    fn reverse_lookup_returns_the_source_phrase() {
        let dictionary = LocalDictionary::from_json_str(SAMPLE).unwrap();

        assert_eq!(
            dictionary.lookup("Close", &lang("fr"), &lang("en")).as_deref(),
            Some("Fermer")
        );
        assert_eq!(
            dictionary.lookup("Next", &lang("fr"), &lang("en")).as_deref(),
            Some("Suivant")
        );
    }

    #[test]
    fn misses_are_none() {
        let dictionary = LocalDictionary::from_json_str(SAMPLE).unwrap();

        assert_eq!(dictionary.lookup("Bienvenue", &lang("fr"), &lang("en")), None);
        assert_eq!(dictionary.lookup("Suivant", &lang("fr"), &lang("es")), None);
        assert_eq!(dictionary.lookup("Musique", &lang("fr"), &lang("ja")), None);
    }

    #[test]
    fn non_string_leaves_are_skipped() {
        let dictionary = LocalDictionary::from_json_str(SAMPLE).unwrap();

        assert_eq!(
            dictionary.lookup("Musique", &lang("fr"), &lang("es")).as_deref(),
            Some("Música")
        );
        assert_eq!(dictionary.languages().count(), 3);
    }

    #[test]
    fn load_falls_through_to_the_next_candidate() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path();
        let broken = dir.join("broken.json");
        let good = dir.join("good.json");
        std::fs::write(&broken, "{ not json").unwrap();
        std::fs::write(&good, SAMPLE).unwrap();

        let dictionary = LocalDictionary::load(&[dir.join("missing.json"), broken, good]);
        assert!(!dictionary.is_empty());

        let empty = LocalDictionary::load(&[dir.join("missing.json")]);
        assert!(empty.is_empty());
    }
}
