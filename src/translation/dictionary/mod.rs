//! 词典模块
//!
//! Offline translation sources: the curated dictionary file and the built-in
//! keyword table used after remote failures.

pub mod fallback;
pub mod local;

pub use fallback::EmbeddedFallback;
pub use local::LocalDictionary;
