//! Chain height collaborator.
//!
//! The registry never advances time itself; it reads the current height
//! from whatever environment it is embedded in.

use std::sync::atomic::{AtomicU64, Ordering};

use pledge_types::BlockHeight;

/// Source of the current, monotonically non-decreasing chain height.
pub trait HeightSource: Send + Sync {
    fn current_height(&self) -> BlockHeight;
}

/// Height that never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedHeight(pub BlockHeight);

impl HeightSource for FixedHeight {
    fn current_height(&self) -> BlockHeight {
        self.0
    }
}

/// Height driven by the embedding environment.
///
/// Updates that would move the height backwards are ignored.
#[derive(Debug, Default)]
pub struct ManualHeight {
    height: AtomicU64,
}

impl ManualHeight {
    pub fn new(start: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(start.value()),
        }
    }

    /// Move to `height` if it is not behind the current one. Returns the
    /// height in effect afterwards.
    pub fn set(&self, height: BlockHeight) -> BlockHeight {
        let previous = self.height.fetch_max(height.value(), Ordering::SeqCst);
        BlockHeight(previous.max(height.value()))
    }

    /// Advance by `blocks`, saturating at `u64::MAX`.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        let mut current = self.height.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(blocks);
            match self
                .height
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return BlockHeight(next),
                Err(actual) => current = actual,
            }
        }
    }
}

impl HeightSource for ManualHeight {
    fn current_height(&self) -> BlockHeight {
        BlockHeight(self.height.load(Ordering::SeqCst))
    }
}
