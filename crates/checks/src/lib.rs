//! Hard-fork verification checks for Celo nodes
//!
//! Each check reads a handful of blocks from a node and asserts that a CIP
//! took effect exactly where it should:
//!
//! - [`cip21`] - the governable lookback window switches value at the first
//!   epoch boundary after the activation block
//! - [`cip28`] - after activation, a validator's coinbase is split from its
//!   signing address and points at the configured tx fee recipient
//!
//! Checks are generic over the capabilities in [`donut_rpc`] and over
//! [`SignerRecovery`](donut_consensus_istanbul::SignerRecovery), so they run
//! against a live node or against [`test_utils::MockNode`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod cip21;
pub mod cip28;
mod config;
mod errors;
mod range;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cip21::{run_cip21, Cip21Report, LookbackSamples, LookbackStage};
pub use cip28::{check_after_activation, check_not_active, run_cip28, Cip28Report, ScanReport};
pub use config::{parse_address, Cip21Config, Cip28Config, ConfigError, DEFAULT_BLOCK_WINDOW};
pub use errors::{CheckError, CheckResult};
pub use range::{ActivationPhase, BlockRange};
