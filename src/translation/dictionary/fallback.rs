//! Keyword substitution used once every remote endpoint has failed
//!
//! A tiny fixed table of flipbook vocabulary. The first keyword found in a
//! string that has an entry for the target language replaces its first
//! occurrence; strings without a known keyword are left alone.

use crate::translation::language::LanguageCode;

type KeywordEntry = (&'static str, &'static [(&'static str, &'static str)]);

const FRENCH_KEYWORDS: &[KeywordEntry] = &[
    (
        "Musique",
        &[("en", "Music"), ("es", "Música"), ("de", "Musik"), ("it", "Musica"), ("zh", "音乐")],
    ),
    (
        "Photo",
        &[("en", "Photo"), ("es", "Foto"), ("de", "Foto"), ("it", "Foto"), ("zh", "照片")],
    ),
    (
        "Galerie",
        &[("en", "Gallery"), ("es", "Galería"), ("de", "Galerie"), ("it", "Galleria"), ("zh", "画廊")],
    ),
    (
        "Track",
        &[("en", "Track"), ("es", "Pista"), ("de", "Track"), ("it", "Traccia"), ("zh", "轨道")],
    ),
    (
        "Fermer",
        &[("en", "Close"), ("es", "Cerrar"), ("de", "Schließen"), ("it", "Chiudere"), ("zh", "关闭")],
    ),
    (
        "Rechercher",
        &[("en", "Search"), ("es", "Buscar"), ("de", "Suchen"), ("it", "Cercare"), ("zh", "搜索")],
    ),
];

const ENGLISH_KEYWORDS: &[KeywordEntry] = &[
    (
        "Music",
        &[("fr", "Musique"), ("es", "Música"), ("de", "Musik"), ("it", "Musica"), ("zh", "音乐")],
    ),
    (
        "Photo",
        &[("fr", "Photo"), ("es", "Foto"), ("de", "Foto"), ("it", "Foto"), ("zh", "照片")],
    ),
    (
        "Gallery",
        &[("fr", "Galerie"), ("es", "Galería"), ("de", "Galerie"), ("it", "Galleria"), ("zh", "画廊")],
    ),
    (
        "Track",
        &[("fr", "Piste"), ("es", "Pista"), ("de", "Track"), ("it", "Traccia"), ("zh", "轨道")],
    ),
    (
        "Close",
        &[("fr", "Fermer"), ("es", "Cerrar"), ("de", "Schließen"), ("it", "Chiudere"), ("zh", "关闭")],
    ),
    (
        "Search",
        &[("fr", "Rechercher"), ("es", "Buscar"), ("de", "Suchen"), ("it", "Cercare"), ("zh", "搜索")],
    ),
];

/// Built-in keyword table
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedFallback;

impl EmbeddedFallback {
    fn keywords(source: &LanguageCode) -> &'static [KeywordEntry] {
        match source.as_str() {
            "fr" => FRENCH_KEYWORDS,
            "en" => ENGLISH_KEYWORDS,
            _ => &[],
        }
    }

    /// Returns the substituted string, or `None` when no keyword applies
    pub fn substitute(&self, text: &str, source: &LanguageCode, target: &LanguageCode) -> Option<String> {
        Self::keywords(source)
            .iter()
            .filter(|(keyword, _)| text.contains(keyword))
            .find_map(|(keyword, translations)| {
                translations
                    .iter()
                    .find(|(language, _)| *target == *language)
                    .map(|(_, translation)| text.replacen(keyword, translation, 1))
            })
    }
}
