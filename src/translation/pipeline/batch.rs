//! 翻译批次管理器模块
//!
//! Groups the distinct texts of one language change into fixed-size batches.
//! Each batch is one remote call; batches are processed one after another in
//! the order the texts were discovered.

use super::collector::TextUnit;
use crate::translation::config::constants;

/// One distinct source text and every unit currently showing it
#[derive(Debug, Clone)]
pub struct PendingText {
    pub text: String,
    pub units: Vec<TextUnit>,
}

impl PendingText {
    pub fn new(text: String, unit: TextUnit) -> Self {
        Self {
            text,
            units: vec![unit],
        }
    }
}

/// 翻译批次信息
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of the batch, starting at 0
    pub index: usize,
    pub items: Vec<PendingText>,
}

impl Batch {
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }

    pub fn unit_count(&self) -> usize {
        self.items.iter().map(|item| item.units.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 批次管理器
#[derive(Debug, Clone, Copy)]
pub struct BatchManager {
    max_batch_size: usize,
}

impl Default for BatchManager {
    fn default() -> Self {
        Self::new(constants::DEFAULT_BATCH_SIZE)
    }
}

impl BatchManager {
    /// A cap of 0 is treated as 1
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: max_batch_size.clamp(1, constants::MAX_BATCH_SIZE),
        }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Splits `items` into `ceil(len / cap)` batches, keeping their order
    pub fn create_batches(&self, items: Vec<PendingText>) -> Vec<Batch> {
        let mut batches = Vec::with_capacity(items.len().div_ceil(self.max_batch_size));
        let mut current = Vec::with_capacity(self.max_batch_size);

        for item in items {
            current.push(item);
            if current.len() == self.max_batch_size {
                batches.push(Batch {
                    index: batches.len(),
                    items: std::mem::take(&mut current),
                });
            }
        }

        if !current.is_empty() {
            batches.push(Batch {
                index: batches.len(),
                items: current,
            });
        }

        tracing::debug!(
            "Created {} batches of at most {} texts",
            batches.len(),
            self.max_batch_size
        );
        batches
    }
}
