//! 存储模块
//!
//! 会话内的翻译缓存，以及跨会话保存的语言偏好。

pub mod cache;
pub mod preferences;

pub use cache::{CacheStats, OriginalTextCache, TranslationCache};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
