//! Result types of Celo specific RPC methods.

use alloy_primitives::U64;
use serde::Deserialize;

/// Unsigned integer served either as a JSON number or a hex quantity.
///
/// `istanbul_getLookbackWindow` returns a bare `uint64`, which geth-based
/// nodes encode as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Plain JSON number.
    Number(u64),
    /// `0x` prefixed hex string.
    Hex(U64),
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        match value {
            Quantity::Number(number) => number,
            Quantity::Hex(hex) => hex.to(),
        }
    }
}
