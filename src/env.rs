//! 统一的环境变量管理系统
//!
//! Typed, validated access to the `FLIPBOOK_*` environment variables. Each
//! variable is a unit struct implementing [`EnvVar`], so its name, default,
//! description and parser live in one place and feed the generated docs.

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// Reads the variable, falling back to [`EnvVar::DEFAULT`] when unset
    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => match Self::DEFAULT {
                Some(default) => Ok(default),
                None => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Required environment variable not set".to_string(),
                }),
            },
        }
    }

    /// Reads the variable only when it is explicitly set
    ///
    /// Configuration overrides use this so that an unset variable never
    /// replaces a value loaded from a file with the built-in default.
    fn from_env() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "FLIPBOOK_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("warn".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored log output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// The language the flipbook is authored in
    pub struct DefaultLang;
    impl EnvVar<String> for DefaultLang {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_DEFAULT_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Language the document is authored in (ISO 639-1 code)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("fr".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_language(value, Self::NAME)
        }
    }

    /// Primary translation endpoint
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Primary translation endpoint URL";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("https://libretranslate.com/translate".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// Fallback endpoints, tried in the listed order
    pub struct FallbackUrls;
    impl EnvVar<Vec<String>> for FallbackUrls {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_FALLBACK_URLS";
        const DEFAULT: Option<Vec<String>> = None;
        const DESCRIPTION: &'static str =
            "Fallback translation endpoint URLs (comma-separated, tried in order)";

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(Vec::new()),
            }
        }

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|url| parse_http_url(url, Self::NAME))
                .collect()
        }
    }

    /// API key sent with every request
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "API key for the translation endpoints (empty for public instances)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(String::new()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 批次大小
    pub struct BatchSize;
    impl EnvVar<usize> for BatchSize {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_BATCH_SIZE";
        const DEFAULT: Option<usize> = Some(10);
        const DESCRIPTION: &'static str = "Maximum number of strings per translation request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100)
        }
    }

    /// 请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Per-endpoint request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 300)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }

    /// Delay before the progress UI closes
    pub struct SettleDelay;
    impl EnvVar<Duration> for SettleDelay {
        const NAME: &'static str = "FLIPBOOK_TRANSLATION_SETTLE_DELAY_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(1000));
        const DESCRIPTION: &'static str =
            "Milliseconds to keep the progress bar visible after a language switch";

        fn parse(value: &str) -> EnvResult<Duration> {
            let millis: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of milliseconds".to_string(),
            })?;

            if millis > 60_000 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Delay too long (max 60000 milliseconds)".to_string(),
                });
            }

            Ok(Duration::from_millis(millis))
        }
    }
}

/// 存储相关环境变量
pub mod storage {
    use super::*;

    /// Local dictionary file
    pub struct DictionaryPath;
    impl EnvVar<String> for DictionaryPath {
        const NAME: &'static str = "FLIPBOOK_DICTIONARY_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the local phrase dictionary (JSON)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// Stored language preference
    pub struct PreferencesPath;
    impl EnvVar<String> for PreferencesPath {
        const NAME: &'static str = "FLIPBOOK_PREFERENCES_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "File holding the last selected language";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("~/.config/flipbook/preferences.toml".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_language(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Language code must be 2 letters (ISO 639-1)".to_string(),
        });
    }
    Ok(lang)
}

fn parse_http_url(value: &str, var_name: &str) -> EnvResult<String> {
    let url = value.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must start with http:// or https://".to_string(),
        })
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core\n\n");
    push_entry(&mut docs, core::LogLevel::NAME, core::LogLevel::DESCRIPTION, Some("warn"));
    push_entry(&mut docs, core::NoColor::NAME, core::NoColor::DESCRIPTION, Some("false"));

    docs.push_str("\n## Translation\n\n");
    push_entry(
        &mut docs,
        translation::DefaultLang::NAME,
        translation::DefaultLang::DESCRIPTION,
        Some("fr"),
    );
    push_entry(
        &mut docs,
        translation::ApiUrl::NAME,
        translation::ApiUrl::DESCRIPTION,
        Some("https://libretranslate.com/translate"),
    );
    push_entry(
        &mut docs,
        translation::FallbackUrls::NAME,
        translation::FallbackUrls::DESCRIPTION,
        None,
    );
    push_entry(&mut docs, translation::ApiKey::NAME, translation::ApiKey::DESCRIPTION, None);
    push_entry(
        &mut docs,
        translation::BatchSize::NAME,
        translation::BatchSize::DESCRIPTION,
        Some("10"),
    );
    push_entry(
        &mut docs,
        translation::RequestTimeout::NAME,
        translation::RequestTimeout::DESCRIPTION,
        Some("10"),
    );
    push_entry(
        &mut docs,
        translation::SettleDelay::NAME,
        translation::SettleDelay::DESCRIPTION,
        Some("1000"),
    );

    docs.push_str("\n## Storage\n\n");
    push_entry(
        &mut docs,
        storage::DictionaryPath::NAME,
        storage::DictionaryPath::DESCRIPTION,
        None,
    );
    push_entry(
        &mut docs,
        storage::PreferencesPath::NAME,
        storage::PreferencesPath::DESCRIPTION,
        Some("~/.config/flipbook/preferences.toml"),
    );

    docs
}

fn push_entry(docs: &mut String, name: &str, description: &str, default: Option<&str>) {
    match default {
        Some(default) => docs.push_str(&format!("- `{}`: {} (default: `{}`)\n", name, description, default)),
        None => docs.push_str(&format!("- `{}`: {}\n", name, description)),
    }
}
