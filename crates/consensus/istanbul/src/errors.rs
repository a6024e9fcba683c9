//! Istanbul errors

use donut_primitives::ISTANBUL_EXTRA_SEAL;

/// Istanbul-specific error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IstanbulError {
    /// Epoch or epoch size is zero, or the epoch's blocks overflow `u64`
    #[error("invalid epoch {epoch} for epoch size {epoch_size}")]
    InvalidEpoch {
        /// Requested epoch.
        epoch: u64,
        /// Blocks per epoch.
        epoch_size: u64,
    },

    /// Extra data does not hold a decodable Istanbul payload
    #[error("invalid istanbul extra data: {0}")]
    InvalidExtraData(alloy_rlp::Error),

    /// Seal is not a 65 byte signature
    #[error("extra-data {ISTANBUL_EXTRA_SEAL} byte seal missing, found {0} bytes")]
    InvalidSealLength(usize),

    /// Seal bytes or recovery id do not form a recoverable signature
    #[error("invalid signature format")]
    InvalidSignatureFormat,

    /// No public key recovers from the seal
    #[error("signature verification failed")]
    SignatureVerificationFailed,
}

/// Result type for Istanbul operations
pub type IstanbulResult<T> = Result<T, IstanbulError>;
