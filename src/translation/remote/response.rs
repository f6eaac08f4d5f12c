//! Response shapes returned by LibreTranslate-compatible services

use serde::Deserialize;

/// Provider answer, tried in declaration order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    /// `{"translatedText": ["..", ".."]}`
    Batch {
        #[serde(rename = "translatedText")]
        translated_text: Vec<String>,
    },
    /// `{"translatedTexts": ["..", ".."]}`
    Plural {
        #[serde(rename = "translatedTexts")]
        translated_texts: Vec<String>,
    },
    /// `{"translatedText": ".."}`
    Single {
        #[serde(rename = "translatedText")]
        translated_text: String,
    },
    /// A bare `[".."]` array, answered by some mirrors
    Bare(Vec<String>),
}

impl ProviderResponse {
    pub fn into_texts(self) -> Vec<String> {
        match self {
            ProviderResponse::Batch { translated_text } => translated_text,
            ProviderResponse::Plural { translated_texts } => translated_texts,
            ProviderResponse::Single { translated_text } => vec![translated_text],
            ProviderResponse::Bare(texts) => texts,
        }
    }

    /// Pairs the answer 1:1 with a request of `expected` strings
    ///
    /// Slots the provider left unanswered are `None`, surplus entries are
    /// dropped.
    pub fn align(self, expected: usize) -> Vec<Option<String>> {
        let mut translated = self.into_texts().into_iter();
        (0..expected).map(|_| translated.next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ProviderResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn recognises_every_shape() {
        assert!(matches!(
            parse(r#"{"translatedText": ["a", "b"]}"#),
            ProviderResponse::Batch { .. }
        ));
        assert!(matches!(
            parse(r#"{"translatedTexts": ["a"]}"#),
            ProviderResponse::Plural { .. }
        ));
        assert!(matches!(
            parse(r#"{"translatedText": "a"}"#),
            ProviderResponse::Single { .. }
        ));
        assert!(matches!(parse(r#"["a"]"#), ProviderResponse::Bare(_)));
    }

    #[test]
    fn unknown_shapes_do_not_parse() {
        assert!(serde_json::from_str::<ProviderResponse>(r#"{"error": "quota"}"#).is_err());
        assert!(serde_json::from_str::<ProviderResponse>(r#"{"translatedText": 3}"#).is_err());
    }

    #[test]
    fn align_marks_missing_and_truncates() {
        assert_eq!(
            parse(r#"{"translatedText": "one"}"#).align(2),
            vec![Some("one".to_string()), None]
        );
        assert_eq!(
            parse(r#"{"translatedTexts": ["one", "two", "three"]}"#).align(2),
            vec![Some("one".to_string()), Some("two".to_string())]
        );
    }
}
