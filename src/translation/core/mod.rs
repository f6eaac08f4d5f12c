//! 翻译系统核心模块
//!
//! - **协调层** (`service.rs`): language change requests, state and caches
//! - **界面层** (`ui.rs`): progress bar and language selector widgets
//!
//! ```text
//! TranslationCoordinator (service.rs)
//!     ├── TextCollector (pipeline/collector.rs)
//!     ├── BatchManager (pipeline/batch.rs)
//!     ├── LocalDictionary (dictionary/local.rs)
//!     ├── RemoteTranslationClient (remote/client.rs)
//!     │       └── EmbeddedFallback (dictionary/fallback.rs)
//!     ├── OriginalTextCache / TranslationCache (storage/cache.rs)
//!     ├── PreferenceStore (storage/preferences.rs)
//!     └── ProgressIndicator / LanguageSelector (ui.rs)
//! ```

pub mod service;
pub mod ui;

pub use service::{
    CoordinatorState, IgnoreReason, LanguageChange, TranslationCoordinator, TranslationReport,
};
pub use ui::{progress_percent, LanguageSelector, ProgressIndicator};
