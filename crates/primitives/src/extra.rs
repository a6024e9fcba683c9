//! Istanbul extra-data payload.
//!
//! A sealed Istanbul header stores consensus data in `extra`:
//! - 32 byte vanity prefix
//! - RLP encoded [`IstanbulExtra`] (validator set diff, proposer seal and
//!   the aggregated BLS seals of the current and parent block)

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};

/// Fixed number of extra-data prefix bytes reserved for proposer vanity.
pub const ISTANBUL_EXTRA_VANITY: usize = 32;

/// Length of the proposer's ECDSA seal (R, S, V).
pub const ISTANBUL_EXTRA_SEAL: usize = 65;

/// Aggregated BLS seal over a block, from a quorum of validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct IstanbulAggregatedSeal {
    /// Bitmap of the validators that contributed to the signature.
    pub bitmap: U256,
    /// Aggregated BLS signature.
    pub signature: Bytes,
    /// Consensus round the seal was produced in.
    pub round: U256,
}

impl IstanbulAggregatedSeal {
    /// Returns `true` if no validator contributed to this seal.
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_zero() && self.signature.is_empty() && self.round.is_zero()
    }
}

/// Decoded Istanbul consensus payload of a header's `extra` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct IstanbulExtra {
    /// Validators added to the set at this block (epoch blocks only).
    pub added_validators: Vec<Address>,
    /// BLS public keys of the added validators.
    pub added_validators_public_keys: Vec<FixedBytes<96>>,
    /// Bitmap of validators removed from the set.
    pub removed_validators: U256,
    /// Proposer's ECDSA seal over the header's signing hash.
    pub seal: Bytes,
    /// Aggregated commit seal for this block.
    pub aggregated_seal: IstanbulAggregatedSeal,
    /// Aggregated commit seal for the parent block.
    pub parent_aggregated_seal: IstanbulAggregatedSeal,
}

impl IstanbulExtra {
    /// Decodes the payload that follows the vanity prefix of a header's `extra`.
    pub fn from_header_extra(extra: &[u8]) -> alloy_rlp::Result<Self> {
        if extra.len() < ISTANBUL_EXTRA_VANITY {
            return Err(alloy_rlp::Error::InputTooShort);
        }

        let mut buf = &extra[ISTANBUL_EXTRA_VANITY..];
        let decoded = Self::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        Ok(decoded)
    }

    /// Builds a header `extra` field from a vanity prefix and this payload.
    pub fn to_header_extra(&self, vanity: &[u8; ISTANBUL_EXTRA_VANITY]) -> Bytes {
        let mut out = Vec::with_capacity(ISTANBUL_EXTRA_VANITY + self.length());
        out.extend_from_slice(vanity);
        self.encode(&mut out);
        out.into()
    }
}

/// Returns the vanity prefix of a header `extra`, zero padded if it is short.
pub(crate) fn vanity_of(extra: &[u8]) -> [u8; ISTANBUL_EXTRA_VANITY] {
    let mut vanity = [0u8; ISTANBUL_EXTRA_VANITY];
    let len = extra.len().min(ISTANBUL_EXTRA_VANITY);
    vanity[..len].copy_from_slice(&extra[..len]);
    vanity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregated_seal_encoding() {
        // Go encodes a zero value seal as a list of three empty strings.
        let mut buf = Vec::new();
        IstanbulAggregatedSeal::default().encode(&mut buf);
        assert_eq!(buf, vec![0xc3, 0x80, 0x80, 0x80]);
    }

    #[test]
    fn test_header_extra_round_trip() {
        let extra = IstanbulExtra {
            added_validators: vec![Address::with_last_byte(1), Address::with_last_byte(2)],
            added_validators_public_keys: vec![FixedBytes::repeat_byte(0xbb); 2],
            removed_validators: U256::from(0b101),
            seal: vec![0xaa; ISTANBUL_EXTRA_SEAL].into(),
            aggregated_seal: IstanbulAggregatedSeal {
                bitmap: U256::from(7),
                signature: vec![0xcc; 48].into(),
                round: U256::from(1),
            },
            parent_aggregated_seal: IstanbulAggregatedSeal::default(),
        };

        let vanity = [0x11; ISTANBUL_EXTRA_VANITY];
        let encoded = extra.to_header_extra(&vanity);
        assert_eq!(&encoded[..ISTANBUL_EXTRA_VANITY], &vanity);
        assert_eq!(IstanbulExtra::from_header_extra(&encoded).unwrap(), extra);
    }

    #[test]
    fn test_short_extra_rejected() {
        let result = IstanbulExtra::from_header_extra(&[0u8; 20]);
        assert_eq!(result, Err(alloy_rlp::Error::InputTooShort));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut extra = IstanbulExtra::default().to_header_extra(&[0u8; 32]).to_vec();
        extra.push(0x00);
        let result = IstanbulExtra::from_header_extra(&extra);
        assert_eq!(result, Err(alloy_rlp::Error::UnexpectedLength));
    }

    #[test]
    fn test_vanity_of_short_extra() {
        let vanity = vanity_of(&[1, 2, 3]);
        assert_eq!(&vanity[..3], &[1, 2, 3]);
        assert!(vanity[3..].iter().all(|b| *b == 0));
    }
}
