//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 语言
    pub const DEFAULT_LANGUAGE: &str = "fr";
    pub const SUPPORTED_LANGUAGES: &[&str] = &["fr", "en", "es", "de", "it", "zh"];

    // 默认API设置
    pub const DEFAULT_PRIMARY_ENDPOINT: &str = "https://libretranslate.com/translate";
    pub const DEFAULT_FALLBACK_ENDPOINTS: &[&str] = &[
        "https://libretranslate.de/translate",
        "https://translate.argosopentech.com/translate",
        "https://translate.terraprint.co/translate",
    ];
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    // 批次处理相关
    pub const DEFAULT_BATCH_SIZE: usize = 10;
    pub const MAX_BATCH_SIZE: usize = 100;
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

    // 存储
    pub const DICTIONARY_PATHS: &[&str] = &[
        "../assets/languages/translations.json",
        "./assets/languages/translations.json",
    ];
    pub const DEFAULT_PREFERENCES_PATH: &str = "~/.config/flipbook/preferences.toml";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "flipbook.toml",
        ".flipbook.toml",
        "~/.config/flipbook/config.toml",
    ];

    // 页面标记
    pub const TRANSLATION_ID_ATTR: &str = "data-translation-id";
    pub const TRANSLATED_ATTR: &str = "data-translated";
    pub const NO_TRANSLATE_ATTR: &str = "data-no-translate";
    pub const LANGUAGE_ATTR: &str = "data-lang";
    pub const TRANSLATING_CLASS: &str = "translating";
    pub const FAILED_CLASS: &str = "translation-failed";
    pub const LANGUAGE_BUTTON_CLASS: &str = "language-btn";
    pub const ACTIVE_CLASS: &str = "active";
    pub const HIDDEN_CLASS: &str = "d-none";
    pub const PROGRESS_CONTAINER_CLASS: &str = "translation-progress";
    pub const PROGRESS_BAR_CLASS: &str = "progress-bar";
    pub const STATUS_ELEMENT_ID: &str = "translation-status";
    pub const LANGUAGE_MODAL_ID: &str = "languageModal";
}

/// Loads the configuration, degrading to defaults when loading fails
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("Configuration could not be loaded, using defaults: {}", e);
            let mut config = TranslationConfig::default();
            config.apply_env_overrides();
            config
        }
    }
}
