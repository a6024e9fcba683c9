//! CIP-28: split etherbase.
//!
//! Before activation a validator's blocks pay fees to the address that signs
//! them. From the activation block on, the coinbase must be the validator's
//! configured tx fee recipient instead.

use crate::{
    config::Cip28Config,
    errors::{CheckError, CheckResult},
    range::{ActivationPhase, BlockRange},
};
use alloy_primitives::Address;
use donut_consensus_istanbul::SignerRecovery;
use donut_primitives::CeloHeader;
use donut_rpc::HeaderSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Blocks authored by the validator within a scanned window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Scanned window.
    pub range: BlockRange,
    /// Numbers of the blocks the validator sealed, ascending.
    pub authored: Vec<u64>,
}

/// Outcome of a passing CIP-28 check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cip28Report {
    /// Window right before the activation block.
    pub before: ScanReport,
    /// Window starting at the activation block.
    pub after: ScanReport,
}

/// Walks `range` in ascending order and calls `check` on every header sealed
/// by `validator`.
///
/// The first failure stops the walk, so no block past it is fetched.
fn scan_authored_blocks<S, R, F>(
    source: &S,
    recovery: &R,
    range: BlockRange,
    validator: Address,
    phase: ActivationPhase,
    mut check: F,
) -> CheckResult<ScanReport>
where
    S: HeaderSource,
    R: SignerRecovery,
    F: FnMut(&CeloHeader, Address) -> CheckResult<()>,
{
    info!(from = range.start(), to = range.end(), "Analyzing blocks {phase} activation");

    let mut authored = Vec::new();
    for block in range.blocks() {
        let header = source.header_by_number(block).map_err(|source| {
            error!(block_number = block, "Error getting block");
            CheckError::Rpc { block, source }
        })?;

        let signer = recovery.recover_author(&header).map_err(|source| {
            error!(block_number = block, "Error recovering block signer");
            CheckError::Recovery { block, source }
        })?;

        if signer != validator {
            continue
        }

        check(&header, signer)?;
        debug!(block_number = block, coinbase = %header.coinbase, %phase, "Validator block ok");
        authored.push(block);
    }

    if authored.is_empty() {
        return Err(CheckError::NoBlocksSigned { validator, phase, range });
    }

    info!(%range, %phase, blocks = authored.len(), "Validator blocks checked");
    Ok(ScanReport { range, authored })
}

/// Checks that every block `validator` sealed in `range` pays its own
/// signing address, as expected while CIP-28 is not active.
pub fn check_not_active<S, R>(
    source: &S,
    recovery: &R,
    range: BlockRange,
    validator: Address,
) -> CheckResult<ScanReport>
where
    S: HeaderSource,
    R: SignerRecovery,
{
    scan_authored_blocks(source, recovery, range, validator, ActivationPhase::Before, |header, signer| {
        if header.coinbase != signer {
            error!(block_number = header.number, %signer, coinbase = %header.coinbase, "Block signer != block coinbase");
            return Err(CheckError::SignerNotCoinbase {
                block: header.number,
                signer,
                coinbase: header.coinbase,
            });
        }
        Ok(())
    })
}

/// Checks that every block `validator` sealed in `range` pays
/// `tx_fee_recipient`, as expected once CIP-28 is active.
pub fn check_after_activation<S, R>(
    source: &S,
    recovery: &R,
    range: BlockRange,
    validator: Address,
    tx_fee_recipient: Address,
) -> CheckResult<ScanReport>
where
    S: HeaderSource,
    R: SignerRecovery,
{
    scan_authored_blocks(source, recovery, range, validator, ActivationPhase::After, |header, signer| {
        if header.coinbase == signer {
            error!(block_number = header.number, %signer, "Block signer == block coinbase");
            return Err(CheckError::SignerIsCoinbase { block: header.number, signer });
        }
        if header.coinbase != tx_fee_recipient {
            error!(
                block_number = header.number,
                coinbase = %header.coinbase,
                expected = %tx_fee_recipient,
                "Block coinbase != tx fee recipient"
            );
            return Err(CheckError::CoinbaseMismatch {
                block: header.number,
                expected: tx_fee_recipient,
                actual: header.coinbase,
            });
        }
        Ok(())
    })
}

/// Runs the CIP-28 check against `source`.
///
/// Both windows are scanned in full before and after the activation block, so
/// the node must have reached `activation_block + window`.
pub fn run_cip28<S, R>(source: &S, recovery: &R, config: &Cip28Config) -> CheckResult<Cip28Report>
where
    S: HeaderSource,
    R: SignerRecovery,
{
    let latest = source.latest_header().map_err(CheckError::LatestHeader)?.number;
    if latest < config.activation_block {
        return Err(CheckError::NodeBehind { latest, required: config.activation_block });
    }

    let before_range = BlockRange::before_activation(config.activation_block, config.window)?;
    let after_range = BlockRange::after_activation(config.activation_block, config.window)?;
    if latest < after_range.end() {
        return Err(CheckError::NodeBehind { latest, required: after_range.end() });
    }

    info!(
        validator = %config.validator,
        tx_fee_recipient = %config.tx_fee_recipient,
        before = %before_range,
        after = %after_range,
        "Scanning validator blocks"
    );

    let before = check_not_active(source, recovery, before_range, config.validator)?;
    let after = check_after_activation(
        source,
        recovery,
        after_range,
        config.validator,
        config.tx_fee_recipient,
    )?;

    Ok(Cip28Report { before, after })
}
