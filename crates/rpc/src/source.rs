//! Capabilities the checkers need from a node.

use crate::errors::RpcResult;
use donut_primitives::CeloHeader;

/// Source of block headers.
pub trait HeaderSource {
    /// Returns the header of the chain head.
    fn latest_header(&self) -> RpcResult<CeloHeader>;

    /// Returns the header of block `number`.
    fn header_by_number(&self, number: u64) -> RpcResult<CeloHeader>;
}

/// Source of the Istanbul lookback window governance value.
pub trait LookbackWindowSource {
    /// Returns the lookback window in effect at block `number`.
    fn lookback_window(&self, number: u64) -> RpcResult<u64>;
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn latest_header(&self) -> RpcResult<CeloHeader> {
        (**self).latest_header()
    }

    fn header_by_number(&self, number: u64) -> RpcResult<CeloHeader> {
        (**self).header_by_number(number)
    }
}

impl<T: LookbackWindowSource + ?Sized> LookbackWindowSource for &T {
    fn lookback_window(&self, number: u64) -> RpcResult<u64> {
        (**self).lookback_window(number)
    }
}
