//! 翻译管道模块
//!
//! 提供文本处理管道，包括收集和批次处理

pub mod batch;
pub mod collector;

// 重新导出主要类型
pub use batch::{Batch, BatchManager, PendingText};
pub use collector::{TextCollector, TextUnit, UnitKind};
