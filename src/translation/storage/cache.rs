//! 翻译缓存模块
//!
//! Two session-local caches owned by the coordinator:
//!
//! - [`OriginalTextCache`]: (source language, unit id) → text shown before the
//!   unit was first translated away from that language. Write-once.
//! - [`TranslationCache`]: (target language, source text) → translated text.
//!   Consulted before any dictionary lookup or network call.
//!
//! Neither cache is persisted; both are rebuilt every session.

use std::collections::HashMap;

use crate::translation::language::LanguageCode;

/// 缓存统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

/// Original texts per (language, unit id)
#[derive(Debug, Default)]
pub struct OriginalTextCache {
    entries: HashMap<LanguageCode, HashMap<String, String>>,
}

impl OriginalTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, language: &LanguageCode, unit_id: &str) -> Option<&str> {
        self.entries
            .get(language)
            .and_then(|texts| texts.get(unit_id))
            .map(String::as_str)
    }

    /// Stores `text` unless an original is already recorded for the pair
    ///
    /// Returns `true` when the text was stored.
    pub fn record(&mut self, language: &LanguageCode, unit_id: &str, text: &str) -> bool {
        let texts = self.entries.entry(language.clone()).or_default();
        if texts.contains_key(unit_id) {
            return false;
        }
        texts.insert(unit_id.to_string(), text.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// 翻译缓存
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<LanguageCode, HashMap<String, String>>,
    stats: CacheStats,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a translation and records a hit or a miss
    pub fn get(&mut self, target: &LanguageCode, source_text: &str) -> Option<String> {
        self.stats.total_requests += 1;

        match self.peek(target, source_text) {
            Some(translated) => {
                let translated = translated.to_string();
                self.stats.cache_hits += 1;
                Some(translated)
            }
            None => {
                self.stats.cache_misses += 1;
                None
            }
        }
    }

    /// Looks up a translation without touching the statistics
    pub fn peek(&self, target: &LanguageCode, source_text: &str) -> Option<&str> {
        self.entries
            .get(target)
            .and_then(|texts| texts.get(source_text))
            .map(String::as_str)
    }

    pub fn insert(&mut self, target: &LanguageCode, source_text: String, translated: String) {
        self.entries
            .entry(target.clone())
            .or_default()
            .insert(source_text, translated);
        self.stats.total_entries = self.len();
    }

    /// Number of entries stored for one target language
    pub fn len_for(&self, target: &LanguageCode) -> usize {
        self.entries.get(target).map(HashMap::len).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_stats(&self) -> CacheStats {
        self.stats
    }

    /// 清空缓存
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.total_entries = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code)
    }

    #[test]
    fn originals_are_write_once() {
        let mut cache = OriginalTextCache::new();

        assert!(cache.record(&lang("fr"), "text-1", "Musique"));
        assert!(!cache.record(&lang("fr"), "text-1", "Music"));
        assert_eq!(cache.get(&lang("fr"), "text-1"), Some("Musique"));
    }

    #[test]
    fn originals_are_scoped_by_language() {
        let mut cache = OriginalTextCache::new();
        cache.record(&lang("fr"), "text-1", "Fermer");
        cache.record(&lang("en"), "text-1", "Close");

        assert_eq!(cache.get(&lang("fr"), "text-1"), Some("Fermer"));
        assert_eq!(cache.get(&lang("en"), "text-1"), Some("Close"));
        assert_eq!(cache.get(&lang("es"), "text-1"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn translations_are_keyed_by_target_and_text() {
        let mut cache = TranslationCache::new();
        cache.insert(&lang("en"), "Musique".to_string(), "Music".to_string());
        cache.insert(&lang("es"), "Musique".to_string(), "Música".to_string());

        assert_eq!(cache.get(&lang("en"), "Musique").as_deref(), Some("Music"));
        assert_eq!(cache.get(&lang("es"), "Musique").as_deref(), Some("Música"));
        assert_eq!(cache.get(&lang("de"), "Musique"), None);
        assert_eq!(cache.len_for(&lang("en")), 1);
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let mut cache = TranslationCache::new();
        cache.insert(&lang("en"), "Fermer".to_string(), "Close".to_string());

        cache.get(&lang("en"), "Fermer");
        cache.get(&lang("en"), "Ouvrir");
        let _ = cache.peek(&lang("en"), "Fermer");

        let stats = cache.get_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
