//! Istanbul consensus helpers for Celo headers
//!
//! This crate holds the two pieces of Istanbul (Celo's BFT consensus) logic
//! the fork checkers rely on:
//!
//! - [`epoch`] - epoch boundary arithmetic (1-indexed epochs, block 0 is genesis)
//! - [`seal`] - recovery of a block's author from the proposer seal

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod epoch;
mod errors;
pub mod seal;

pub use epoch::{epoch_first_block, epoch_last_block, epoch_number, is_last_block_of_epoch};
pub use errors::{IstanbulError, IstanbulResult};
pub use seal::{recover_author, seal_header, sig_hash, EcRecover, SignerRecovery};
