//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::{LanguageCode, SupportedLanguages};

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 语言配置
    pub default_language: String,
    pub supported_languages: Vec<String>,

    // API配置
    pub primary_endpoint: String,
    pub fallback_endpoints: Vec<String>,
    pub api_key: String,
    pub request_timeout_secs: u64,

    // 批次配置
    pub batch_size: usize,
    pub settle_delay_ms: u64,

    // 存储配置
    pub dictionary_paths: Vec<String>,
    pub preferences_path: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_language: constants::DEFAULT_LANGUAGE.to_string(),
            supported_languages: constants::SUPPORTED_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),

            primary_endpoint: constants::DEFAULT_PRIMARY_ENDPOINT.to_string(),
            fallback_endpoints: constants::DEFAULT_FALLBACK_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_key: String::new(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            batch_size: constants::DEFAULT_BATCH_SIZE,
            settle_delay_ms: constants::DEFAULT_SETTLE_DELAY.as_millis() as u64,

            dictionary_paths: constants::DICTIONARY_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preferences_path: constants::DEFAULT_PREFERENCES_PATH.to_string(),
        }
    }
}

impl TranslationConfig {
    /// 创建带指定源语言的默认配置
    pub fn default_with_lang(default_language: &str) -> Self {
        Self {
            default_language: default_language.to_string(),
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.batch_size == 0 || self.batch_size > constants::MAX_BATCH_SIZE {
            return Err(TranslationError::ConfigError(format!(
                "batch size must be between 1 and {}",
                constants::MAX_BATCH_SIZE
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        let languages = self.languages()?;
        if !languages.contains(&self.default_language()) {
            return Err(TranslationError::UnsupportedLanguage(
                self.default_language.clone(),
            ));
        }

        self.endpoint_urls()?;

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{storage, translation, EnvVar};

        if let Some(lang) = translation::DefaultLang::from_env().and_then(ok_or_warn) {
            self.default_language = lang;
        }

        if let Some(url) = translation::ApiUrl::from_env().and_then(ok_or_warn) {
            tracing::info!("Primary endpoint overridden by environment: {}", url);
            self.primary_endpoint = url;
        }

        if let Some(urls) = translation::FallbackUrls::from_env().and_then(ok_or_warn) {
            self.fallback_endpoints = urls;
        }

        if let Some(key) = translation::ApiKey::from_env().and_then(ok_or_warn) {
            self.api_key = key;
        }

        if let Some(batch_size) = translation::BatchSize::from_env().and_then(ok_or_warn) {
            self.batch_size = batch_size;
        }

        if let Some(timeout) = translation::RequestTimeout::from_env().and_then(ok_or_warn) {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(delay) = translation::SettleDelay::from_env().and_then(ok_or_warn) {
            self.settle_delay_ms = delay.as_millis() as u64;
        }

        if let Some(path) = storage::DictionaryPath::from_env().and_then(ok_or_warn) {
            self.dictionary_paths = vec![path];
        }

        if let Some(path) = storage::PreferencesPath::from_env().and_then(ok_or_warn) {
            self.preferences_path = path;
        }
    }

    pub fn default_language(&self) -> LanguageCode {
        LanguageCode::new(&self.default_language)
    }

    pub fn languages(&self) -> TranslationResult<SupportedLanguages> {
        SupportedLanguages::new(&self.supported_languages)
    }

    /// Primary endpoint followed by the fallbacks, in declared order
    pub fn endpoint_urls(&self) -> TranslationResult<Vec<Url>> {
        std::iter::once(&self.primary_endpoint)
            .chain(self.fallback_endpoints.iter())
            .map(|raw| {
                let url = Url::parse(raw)?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    scheme => Err(TranslationError::ConfigError(format!(
                        "endpoint {} uses unsupported scheme {}",
                        raw, scheme
                    ))),
                }
            })
            .collect()
    }

    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Dictionary candidates with `~` expanded, in the order they are tried
    pub fn dictionary_paths(&self) -> Vec<PathBuf> {
        self.dictionary_paths
            .iter()
            .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()))
            .collect()
    }

    pub fn preferences_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.preferences_path).as_ref())
    }
}

fn ok_or_warn<T>(result: crate::env::EnvResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring invalid environment override: {}", e);
            None
        }
    }
}

/// 简化的配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// Discovers a configuration file, applies environment overrides and
    /// validates the result
    pub fn new() -> TranslationResult<Self> {
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// Same as [`ConfigManager::new`] but reads an explicit file
    pub fn from_path<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> TranslationResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let path = Path::new(expanded_path.as_ref());
            if path.exists() {
                tracing::info!("Loading configuration file: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|e| {
                TranslationError::ConfigError(format!("invalid JSON in {}: {}", path.display(), e))
            })
        } else {
            toml::from_str(&content).map_err(|e| {
                TranslationError::ConfigError(format!("invalid TOML in {}: {}", path.display(), e))
            })
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("Loaded environment file: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> TranslationResult<()> {
        let content = toml::to_string_pretty(&TranslationConfig::default())?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            TranslationError::ConfigError(format!(
                "cannot write {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(())
    }
}
