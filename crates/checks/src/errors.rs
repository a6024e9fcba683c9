//! Check errors

use crate::{cip21::LookbackStage, range::{ActivationPhase, BlockRange}};
use alloy_primitives::Address;
use donut_consensus_istanbul::IstanbulError;
use donut_rpc::RpcError;

/// Reasons a check did not pass
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Chain head could not be fetched
    #[error("error getting latest block")]
    LatestHeader(#[source] RpcError),

    /// Header or value of a block could not be fetched
    #[error("failed to fetch data for block {block}")]
    Rpc {
        /// Requested block.
        block: u64,
        /// Underlying RPC error.
        #[source]
        source: RpcError,
    },

    /// Author of a block could not be recovered from its seal
    #[error("error recovering block signer of block {block}")]
    Recovery {
        /// Block whose seal is invalid.
        block: u64,
        /// Underlying recovery error.
        #[source]
        source: IstanbulError,
    },

    /// Node has not reached a block the check needs
    #[error("node's latest block ({latest}) must be at least {required}")]
    NodeBehind {
        /// Chain head of the node.
        latest: u64,
        /// Highest block the check reads.
        required: u64,
    },

    /// Activation falls in the first epoch, so there is no epoch before it
    #[error("hardfork activation epoch must be bigger than 1, got {0}")]
    ActivationEpochTooLow(u64),

    /// Epoch arithmetic failed for the configured epoch size
    #[error("invalid epoch parameters")]
    Epoch(#[from] IstanbulError),

    /// Window bounds are reversed or overflow
    #[error("invalid block range [{start}, {end}]")]
    InvalidRange {
        /// First block.
        start: u64,
        /// Last block.
        end: u64,
    },

    /// Lookback window differs from the expected value
    #[error(
        "LookbackWindow value {stage} should be {expected} but is {actual} (blockNumber={block})"
    )]
    LookbackWindowMismatch {
        /// Position of the block relative to the fork.
        stage: LookbackStage,
        /// Sampled block.
        block: u64,
        /// Configured value.
        expected: u64,
        /// Value reported by the node.
        actual: u64,
    },

    /// Validator collected its own fees before the split was active
    #[error(
        "CIP Error: block signer != block coinbase before activation block (blockNumber={block}, signer={signer}, coinbase={coinbase})"
    )]
    SignerNotCoinbase {
        /// Offending block.
        block: u64,
        /// Recovered author.
        signer: Address,
        /// Header coinbase.
        coinbase: Address,
    },

    /// Validator still collects fees on its signing address after activation
    #[error("CIP Error: block signer == block coinbase after activation block (blockNumber={block}, signer={signer})")]
    SignerIsCoinbase {
        /// Offending block.
        block: u64,
        /// Recovered author, equal to the coinbase.
        signer: Address,
    },

    /// Coinbase after activation is not the configured recipient
    #[error(
        "CIP Error: block coinbase != tx fee recipient after activation block (blockNumber={block}, coinbase={actual}, expected={expected})"
    )]
    CoinbaseMismatch {
        /// Offending block.
        block: u64,
        /// Configured tx fee recipient.
        expected: Address,
        /// Header coinbase.
        actual: Address,
    },

    /// Validator signed nothing in the window, so the window proves nothing
    #[error("can't find any blocks signed by {validator} {phase} activation block in {range}")]
    NoBlocksSigned {
        /// Validator being checked.
        validator: Address,
        /// Side of the activation block.
        phase: ActivationPhase,
        /// Scanned window.
        range: BlockRange,
    },
}

/// Result type for checks
pub type CheckResult<T> = Result<T, CheckError>;
