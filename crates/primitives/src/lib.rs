//! Celo primitive types used by the fork checkers.
//!
//! This crate provides the Istanbul-era block header as served by a Celo node
//! over JSON-RPC, and the Istanbul extra-data payload carried in the header's
//! `extra` field.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod extra;
mod header;

pub use extra::{IstanbulAggregatedSeal, IstanbulExtra, ISTANBUL_EXTRA_SEAL, ISTANBUL_EXTRA_VANITY};
pub use header::CeloHeader;

pub use alloy_primitives::{Address, BlockHash, Bloom, Bytes, B256, U256};
