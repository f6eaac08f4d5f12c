//! Language codes and the fixed set of languages a flipbook offers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::translation::error::{TranslationError, TranslationResult};

/// An opaque short language identifier such as `fr` or `en`
///
/// Codes are stored trimmed and lowercased so that `"FR "` and `"fr"` compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: &str) -> Self {
        LanguageCode(code.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        LanguageCode::new(&code)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        LanguageCode::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ordered set of languages the language selector offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    codes: Vec<LanguageCode>,
}

impl SupportedLanguages {
    pub fn new<I, S>(codes: I) -> TranslationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<LanguageCode> = Vec::new();
        for code in codes {
            let code = LanguageCode::new(code.as_ref());
            if code.as_str().is_empty() {
                return Err(TranslationError::ConfigError(
                    "language codes cannot be empty".to_string(),
                ));
            }
            if !unique.contains(&code) {
                unique.push(code);
            }
        }

        if unique.is_empty() {
            return Err(TranslationError::ConfigError(
                "at least one supported language is required".to_string(),
            ));
        }

        Ok(Self { codes: unique })
    }

    /// Normalizes `code` and returns it when it is supported
    pub fn resolve(&self, code: &str) -> Option<LanguageCode> {
        let code = LanguageCode::new(code);
        self.codes.iter().find(|known| **known == code).cloned()
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.codes.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
