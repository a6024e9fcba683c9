//! Inclusive block ranges scanned by the checks.

use crate::errors::{CheckError, CheckResult};
use core::{fmt, ops::RangeInclusive};
use serde::{Deserialize, Serialize};

/// Side of the activation block a range lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationPhase {
    /// Blocks strictly before the activation block.
    Before,
    /// The activation block and the blocks after it.
    After,
}

impl fmt::Display for ActivationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// Inclusive range of block numbers, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    start: u64,
    end: u64,
}

impl BlockRange {
    /// Creates the range `[start, end]`.
    pub const fn new(start: u64, end: u64) -> CheckResult<Self> {
        if start > end {
            return Err(CheckError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window ending right before `activation_block`.
    ///
    /// Covers `window + 1` blocks, clamped so that genesis, which carries no
    /// seal, is never scanned.
    pub const fn before_activation(activation_block: u64, window: u64) -> CheckResult<Self> {
        let end = activation_block.saturating_sub(1);
        let start = activation_block.saturating_sub(window.saturating_add(1));
        Self::new(if start == 0 { 1 } else { start }, end)
    }

    /// Window starting at `activation_block` and covering `window + 1` blocks.
    pub const fn after_activation(activation_block: u64, window: u64) -> CheckResult<Self> {
        match activation_block.checked_add(window) {
            Some(end) => Self::new(activation_block, end),
            None => Err(CheckError::InvalidRange { start: activation_block, end: u64::MAX }),
        }
    }

    /// First block of the range.
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Last block of the range.
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Number of blocks in the range.
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always `false`, a range holds at least one block.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `block` lies in the range.
    pub const fn contains(&self, block: u64) -> bool {
        self.start <= block && block <= self.end
    }

    /// Block numbers in ascending order.
    pub const fn blocks(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
