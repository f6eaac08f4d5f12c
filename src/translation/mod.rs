//! 翻译模块
//!
//! Switches the visible language of a flipbook page:
//! - **core**: 翻译协调器与页面组件
//! - **pipeline**: 文本收集与批次处理
//! - **dictionary**: 本地词典与内置关键词表
//! - **remote**: LibreTranslate 兼容的远程翻译
//! - **storage**: 会话缓存与语言偏好
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use flipbook_translator::parsers::html_to_dom;
//! use flipbook_translator::translation::{load_translation_config, TranslationCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_translation_config();
//! let coordinator = TranslationCoordinator::from_config(&config)?;
//!
//! let dom = html_to_dom(b"<button>Fermer</button>", "utf-8")?;
//! let change = coordinator.change_language(&dom.document, "en").await;
//! println!("{:?}", change.report());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块
pub mod config;

/// 翻译协调器与页面组件
pub mod core;

/// Offline translation sources
pub mod dictionary;

/// 错误处理模块
pub mod error;

pub mod language;

/// 文本处理管道模块
pub mod pipeline;

/// Remote translation endpoints
pub mod remote;

/// 存储管理模块
pub mod storage;

// ============================================================================
// 公共接口重新导出
// ============================================================================

pub use config::{load_translation_config, ConfigManager, TranslationConfig};
pub use self::core::{
    CoordinatorState, IgnoreReason, LanguageChange, LanguageSelector, ProgressIndicator,
    TranslationCoordinator, TranslationReport,
};
pub use dictionary::{EmbeddedFallback, LocalDictionary};
pub use error::{ErrorSeverity, TranslationError, TranslationResult};
pub use language::{LanguageCode, SupportedLanguages};
pub use pipeline::{Batch, BatchManager, PendingText, TextCollector, TextUnit, UnitKind};
pub use remote::{
    HttpEndpoint, ProviderResponse, RemoteTranslationClient, ResolvedText, TextOrigin,
    TranslateRequest, TranslationEndpoint,
};
pub use storage::{
    CacheStats, FilePreferenceStore, MemoryPreferenceStore, OriginalTextCache, PreferenceStore,
    TranslationCache,
};
