//! # Flipbook Translator
//!
//! 为HTML翻页书提供语言切换：收集页面上可翻译的文本，依次通过会话缓存、
//! 本地词典、远程翻译服务和内置关键词表解析，再写回页面。
//!
//! ## 模块组织
//!
//! - `core` - 文档读写与整页翻译入口
//! - `env` - `FLIPBOOK_*` 环境变量
//! - `parsers` - HTML解析、DOM操作与序列化
//! - `translation` - 翻译协调器及其子系统

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use self::core::*;
pub use parsers::*;
pub use translation::{
    LanguageChange, TranslationConfig, TranslationCoordinator, TranslationError,
    TranslationResult,
};
