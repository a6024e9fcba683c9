//! Command line plumbing shared by the hard-fork checkers
//!
//! - [`RpcArgs`] - the `--rpc` endpoint flag
//! - [`parse_args`] - parsing that accepts Go-style `-flag` spellings
//! - [`exit_with_usage`] - reporting invalid options
//! - [`init_tracing`] - stderr logging

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod args;
mod logs;

pub use args::{exit_with_usage, normalize_legacy_flags, parse_args, RpcArgs, DEFAULT_RPC_URL};
pub use logs::init_tracing;
