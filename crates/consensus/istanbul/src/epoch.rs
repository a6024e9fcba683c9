//! Epoch boundary arithmetic.
//!
//! Epochs are 1-indexed: epoch `e` spans blocks `(e-1)*size + 1 ..= e*size`.
//! Block 0 (genesis) is the only block of epoch 0.

use crate::errors::{IstanbulError, IstanbulResult};

/// Returns the epoch containing `block_number`.
pub const fn epoch_number(block_number: u64, epoch_size: u64) -> IstanbulResult<u64> {
    if epoch_size == 0 {
        return Err(IstanbulError::InvalidEpoch { epoch: 0, epoch_size });
    }
    Ok(block_number.div_ceil(epoch_size))
}

/// Returns the first block number of `epoch`.
pub const fn epoch_first_block(epoch: u64, epoch_size: u64) -> IstanbulResult<u64> {
    if epoch == 0 || epoch_size == 0 {
        return Err(IstanbulError::InvalidEpoch { epoch, epoch_size });
    }
    match (epoch - 1).checked_mul(epoch_size) {
        Some(previous_last) => Ok(previous_last + 1),
        None => Err(IstanbulError::InvalidEpoch { epoch, epoch_size }),
    }
}

/// Returns the last block number of `epoch`.
pub const fn epoch_last_block(epoch: u64, epoch_size: u64) -> IstanbulResult<u64> {
    if epoch == 0 || epoch_size == 0 {
        return Err(IstanbulError::InvalidEpoch { epoch, epoch_size });
    }
    match epoch.checked_mul(epoch_size) {
        Some(last) => Ok(last),
        None => Err(IstanbulError::InvalidEpoch { epoch, epoch_size }),
    }
}

/// Returns `true` if `block_number` closes its epoch.
pub const fn is_last_block_of_epoch(block_number: u64, epoch_size: u64) -> bool {
    epoch_size != 0 && block_number % epoch_size == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_number() {
        assert_eq!(epoch_number(0, 100), Ok(0));
        assert_eq!(epoch_number(1, 100), Ok(1));
        assert_eq!(epoch_number(100, 100), Ok(1));
        assert_eq!(epoch_number(101, 100), Ok(2));
        assert_eq!(epoch_number(250, 100), Ok(3));
        assert_eq!(epoch_number(17_280, 17_280), Ok(1));
    }

    #[test]
    fn test_epoch_number_zero_size() {
        assert!(matches!(epoch_number(10, 0), Err(IstanbulError::InvalidEpoch { .. })));
    }

    #[test]
    fn test_epoch_bounds() {
        assert_eq!(epoch_first_block(1, 100), Ok(1));
        assert_eq!(epoch_last_block(1, 100), Ok(100));
        assert_eq!(epoch_first_block(3, 100), Ok(201));
        assert_eq!(epoch_last_block(3, 100), Ok(300));
    }

    #[test]
    fn test_epoch_zero_rejected() {
        for size in [0, 1, 100, u64::MAX] {
            assert_eq!(
                epoch_first_block(0, size),
                Err(IstanbulError::InvalidEpoch { epoch: 0, epoch_size: size })
            );
            assert!(epoch_last_block(0, size).is_err());
        }
        assert!(epoch_first_block(5, 0).is_err());
    }

    #[test]
    fn test_epoch_overflow_rejected() {
        assert!(epoch_last_block(u64::MAX, 2).is_err());
        assert!(epoch_first_block(u64::MAX, 2).is_err());
        assert_eq!(epoch_last_block(u64::MAX, 1), Ok(u64::MAX));
    }

    #[test]
    fn test_is_last_block_of_epoch() {
        assert!(is_last_block_of_epoch(100, 100));
        assert!(is_last_block_of_epoch(0, 100));
        assert!(!is_last_block_of_epoch(101, 100));
        assert!(!is_last_block_of_epoch(100, 0));
    }
}
