//! 翻译模块统一错误处理
//!
//! Every fallible step in the translation chain returns
//! [`TranslationResult`]. The coordinator consumes these results and decides
//! which fallback tier runs next, so none of them reaches the page.

use std::time::Duration;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The requested language is not part of the supported set
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// 网络错误
    #[error("network error at {endpoint}: {details}")]
    NetworkError { endpoint: String, details: String },

    /// Non-2xx answer from a translation endpoint
    #[error("endpoint {endpoint} answered HTTP {status}: {details}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        details: String,
    },

    /// The endpoint answered with a body that is not a known response shape
    #[error("malformed response from {endpoint}: {details}")]
    MalformedResponse { endpoint: String, details: String },

    /// 超时错误
    #[error("request to {endpoint} timed out after {timeout:?}")]
    TimeoutError { endpoint: String, timeout: Duration },

    /// Every configured endpoint failed for one batch
    #[error("all {attempts} translation endpoints failed, last error: {last}")]
    AllEndpointsFailed { attempts: usize, last: String },

    /// Loading or parsing the local dictionary failed
    #[error("dictionary error: {0}")]
    DictionaryError(String),

    /// Reading or writing the stored language preference failed
    #[error("preference storage error: {0}")]
    PreferenceError(String),

    /// 解析错误
    #[error("parse error: {0}")]
    ParseError(String),

    /// 序列化错误
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO错误
    #[error("I/O error: {0}")]
    IoError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::UnsupportedLanguage(_) => ErrorSeverity::Info,
            TranslationError::NetworkError { .. } => ErrorSeverity::Warning,
            TranslationError::HttpStatus { .. } => ErrorSeverity::Warning,
            TranslationError::MalformedResponse { .. } => ErrorSeverity::Warning,
            TranslationError::TimeoutError { .. } => ErrorSeverity::Warning,
            TranslationError::AllEndpointsFailed { .. } => ErrorSeverity::Error,
            TranslationError::DictionaryError(_) => ErrorSeverity::Warning,
            TranslationError::PreferenceError(_) => ErrorSeverity::Warning,
            TranslationError::ParseError(_) => ErrorSeverity::Error,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// True for failures of a single endpoint call, which move the client on
    /// to the next endpoint
    pub fn is_endpoint_failure(&self) -> bool {
        matches!(
            self,
            TranslationError::NetworkError { .. }
                | TranslationError::HttpStatus { .. }
                | TranslationError::MalformedResponse { .. }
                | TranslationError::TimeoutError { .. }
        )
    }

    /// Emits the error through `tracing` at the level matching its severity
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Info => tracing::info!("{}", self),
            ErrorSeverity::Warning => tracing::warn!("{}", self),
            ErrorSeverity::Error | ErrorSeverity::Critical => tracing::error!("{}", self),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ParseError(format!("TOML: {}", error))
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::SerializationError(format!("TOML: {}", error))
    }
}

impl From<url::ParseError> for TranslationError {
    fn from(error: url::ParseError) -> Self {
        TranslationError::ConfigError(format!("invalid endpoint URL: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;
