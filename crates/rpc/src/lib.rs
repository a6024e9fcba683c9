//! JSON-RPC access to a Celo node.
//!
//! The fork checkers only depend on the capability traits in this crate:
//!
//! - [`HeaderSource`] - latest header and headers by number
//! - [`LookbackWindowSource`] - the governable Istanbul lookback window
//!
//! [`HttpClient`] implements both over a blocking HTTP transport.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod client;
mod errors;
mod source;
pub mod types;

pub use client::HttpClient;
pub use errors::{RpcError, RpcResult};
pub use source::{HeaderSource, LookbackWindowSource};
