//! CIP-21: governable lookback window.
//!
//! The lookback window read by the node must keep its pre-fork value through
//! the epoch in which the fork activates, and switch to the post-fork value at
//! the first block of the following epoch.

use crate::{
    config::Cip21Config,
    errors::{CheckError, CheckResult},
};
use core::fmt;
use donut_consensus_istanbul::{epoch_first_block, epoch_last_block, epoch_number, IstanbulError};
use donut_rpc::{HeaderSource, LookbackWindowSource};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Where a sampled block sits relative to the hard fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackStage {
    /// Last block of the epoch before the activation epoch.
    PreHardFork,
    /// First or last block of the activation epoch.
    HardForkEpoch,
    /// First block of the epoch after the activation epoch.
    PostHardFork,
}

impl fmt::Display for LookbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreHardFork => f.write_str("pre hardfork"),
            Self::HardForkEpoch => f.write_str("on hardfork's epoch"),
            Self::PostHardFork => f.write_str("post hardfork"),
        }
    }
}

/// The four blocks sampled around the activation epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackSamples {
    /// Epoch containing the activation block.
    pub activation_epoch: u64,
    /// Last block of the epoch before the activation epoch.
    pub last_block_before: u64,
    /// First block of the activation epoch.
    pub first_block_activation: u64,
    /// Last block of the activation epoch.
    pub last_block_activation: u64,
    /// First block of the epoch after the activation epoch.
    pub first_block_after: u64,
}

impl LookbackSamples {
    /// Picks the sample blocks for a fork activating at `activation_block`.
    ///
    /// Fails if the activation falls in epoch 1, which has no preceding epoch.
    pub fn new(activation_block: u64, epoch_size: u64) -> CheckResult<Self> {
        let activation_epoch = epoch_number(activation_block, epoch_size)?;
        if activation_epoch <= 1 {
            return Err(CheckError::ActivationEpochTooLow(activation_epoch));
        }

        let next_epoch = activation_epoch
            .checked_add(1)
            .ok_or(IstanbulError::InvalidEpoch { epoch: activation_epoch, epoch_size })?;

        Ok(Self {
            activation_epoch,
            last_block_before: epoch_last_block(activation_epoch - 1, epoch_size)?,
            first_block_activation: epoch_first_block(activation_epoch, epoch_size)?,
            last_block_activation: epoch_last_block(activation_epoch, epoch_size)?,
            first_block_after: epoch_first_block(next_epoch, epoch_size)?,
        })
    }

    /// Sampled blocks with their stage and expected value, in the order they
    /// are checked.
    pub const fn expectations(&self, value_before: u64, value_after: u64) -> [(LookbackStage, u64, u64); 4] {
        [
            (LookbackStage::PreHardFork, self.last_block_before, value_before),
            (LookbackStage::HardForkEpoch, self.first_block_activation, value_before),
            (LookbackStage::HardForkEpoch, self.last_block_activation, value_before),
            (LookbackStage::PostHardFork, self.first_block_after, value_after),
        ]
    }
}

/// Values observed by a passing CIP-21 check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cip21Report {
    /// Sampled blocks.
    pub samples: LookbackSamples,
    /// `(block, lookback window)` pairs in the order they were read.
    pub observed: Vec<(u64, u64)>,
}

/// Runs the CIP-21 check against `source`.
///
/// Stops at the first RPC error or unexpected value.
pub fn run_cip21<S>(source: &S, config: &Cip21Config) -> CheckResult<Cip21Report>
where
    S: HeaderSource + LookbackWindowSource,
{
    let latest = source.latest_header().map_err(CheckError::LatestHeader)?.number;
    if latest < config.activation_block {
        return Err(CheckError::NodeBehind { latest, required: config.activation_block });
    }

    let samples = LookbackSamples::new(config.activation_block, config.epoch_size)?;
    if latest < samples.first_block_after {
        return Err(CheckError::NodeBehind { latest, required: samples.first_block_after });
    }

    info!(
        activation_epoch = samples.activation_epoch,
        first_block_after = samples.first_block_after,
        "Sampling lookbackWindow around activation epoch"
    );

    let mut observed = Vec::with_capacity(4);
    for (stage, block, expected) in samples.expectations(config.value_before, config.value_after) {
        let actual = source.lookback_window(block).map_err(|source| {
            error!(block_number = block, "Failed to obtain lookbackWindow");
            CheckError::Rpc { block, source }
        })?;

        if actual != expected {
            error!(block_number = block, expected, actual, %stage, "Unexpected lookbackWindow");
            return Err(CheckError::LookbackWindowMismatch { stage, block, expected, actual });
        }

        info!(block_number = block, value = actual, %stage, "LookbackWindow matches");
        observed.push((block, actual));
    }

    Ok(Cip21Report { samples, observed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_around_activation() {
        let samples = LookbackSamples::new(250, 100).unwrap();
        assert_eq!(samples.activation_epoch, 3);
        assert_eq!(samples.last_block_before, 200);
        assert_eq!(samples.first_block_activation, 201);
        assert_eq!(samples.last_block_activation, 300);
        assert_eq!(samples.first_block_after, 301);
    }

    #[test]
    fn test_activation_on_epoch_boundary() {
        // Block 300 is the last block of epoch 3
        let samples = LookbackSamples::new(300, 100).unwrap();
        assert_eq!(samples.activation_epoch, 3);
        assert_eq!(samples.first_block_after, 301);

        let samples = LookbackSamples::new(301, 100).unwrap();
        assert_eq!(samples.activation_epoch, 4);
        assert_eq!(samples.last_block_before, 300);
    }

    #[test]
    fn test_activation_in_first_epoch() {
        assert!(matches!(
            LookbackSamples::new(50, 100),
            Err(CheckError::ActivationEpochTooLow(1))
        ));
        assert!(matches!(LookbackSamples::new(100, 100), Err(CheckError::ActivationEpochTooLow(1))));
    }

    #[test]
    fn test_last_epoch_rejected() {
        assert!(matches!(
            LookbackSamples::new(u64::MAX, 1),
            Err(CheckError::Epoch(IstanbulError::InvalidEpoch { epoch: u64::MAX, epoch_size: 1 }))
        ));
        // Next epoch would start past u64::MAX
        assert!(matches!(
            LookbackSamples::new(u64::MAX, 2),
            Err(CheckError::Epoch(IstanbulError::InvalidEpoch { .. }))
        ));
    }

    #[test]
    fn test_expectations_order() {
        let samples = LookbackSamples::new(250, 100).unwrap();
        let expectations = samples.expectations(5, 10);
        let blocks: Vec<_> = expectations.iter().map(|(_, block, _)| *block).collect();
        let values: Vec<_> = expectations.iter().map(|(_, _, value)| *value).collect();
        assert_eq!(blocks, vec![200, 201, 300, 301]);
        assert_eq!(values, vec![5, 5, 5, 10]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(LookbackStage::PreHardFork.to_string(), "pre hardfork");
        assert_eq!(LookbackStage::HardForkEpoch.to_string(), "on hardfork's epoch");
        assert_eq!(LookbackStage::PostHardFork.to_string(), "post hardfork");
    }
}
