//! Proposer seal handling.
//!
//! The proposer of an Istanbul block signs the header with its aggregated and
//! proposer seals cleared. Celo's signing routine hashes the payload once more
//! before signing, so the signed digest is `keccak256(sig_hash(header))`.

use crate::errors::{IstanbulError, IstanbulResult};
use alloy_primitives::{keccak256, Address, B256};
use alloy_rlp::Encodable;
use donut_primitives::{CeloHeader, ISTANBUL_EXTRA_SEAL};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};
use tracing::trace;

/// Recovers the author of a block from its header.
///
/// Checks depend on this rather than on [`recover_author`] directly so they
/// can run against headers that carry no real seal.
pub trait SignerRecovery {
    /// Returns the address that sealed `header`.
    fn recover_author(&self, header: &CeloHeader) -> IstanbulResult<Address>;
}

/// [`SignerRecovery`] backed by secp256k1 public key recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcRecover;

impl SignerRecovery for EcRecover {
    fn recover_author(&self, header: &CeloHeader) -> IstanbulResult<Address> {
        recover_author(header)
    }
}

/// Returns `header` with the aggregated seal cleared, and the proposer seal
/// too unless `keep_seal` is set.
pub fn istanbul_filtered_header(header: &CeloHeader, keep_seal: bool) -> IstanbulResult<CeloHeader> {
    header.istanbul_filtered(keep_seal).map_err(IstanbulError::InvalidExtraData)
}

/// Hash of the header payload covered by the proposer seal.
pub fn sig_hash(header: &CeloHeader) -> IstanbulResult<B256> {
    let filtered = istanbul_filtered_header(header, false)?;
    let mut buf = Vec::with_capacity(filtered.length());
    filtered.encode(&mut buf);
    Ok(keccak256(&buf))
}

/// Extracts the 65 byte proposer seal from the header's Istanbul extra.
pub fn extract_seal(header: &CeloHeader) -> IstanbulResult<[u8; ISTANBUL_EXTRA_SEAL]> {
    let extra = header.istanbul_extra().map_err(IstanbulError::InvalidExtraData)?;
    extra.seal.as_ref().try_into().map_err(|_| IstanbulError::InvalidSealLength(extra.seal.len()))
}

/// Recover the author address from a header's seal
///
/// Uses ECDSA recovery on the digest the proposer signed.
pub fn recover_author(header: &CeloHeader) -> IstanbulResult<Address> {
    let seal = extract_seal(header)?;

    // Celo signs with V in {0, 1}; accept Ethereum style 27/28 as well
    let v = seal[64];
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(IstanbulError::InvalidSignatureFormat),
    };

    let sig = RecoverableSignature::from_compact(
        &seal[..64],
        RecoveryId::from_i32(i32::from(recovery_id))
            .map_err(|_| IstanbulError::InvalidSignatureFormat)?,
    )
    .map_err(|_| IstanbulError::InvalidSignatureFormat)?;

    let message = signing_message(header)?;
    let public_key = SECP256K1
        .recover_ecdsa(&message, &sig)
        .map_err(|_| IstanbulError::SignatureVerificationFailed)?;

    let author = public_key_to_address(&public_key);
    trace!(block_number = header.number, %author, "Recovered block author");
    Ok(author)
}

/// Seals `header` with `secret_key`, replacing any existing proposer seal.
///
/// The aggregated seals are left untouched since they do not affect the
/// signing hash.
pub fn seal_header(header: &CeloHeader, secret_key: &SecretKey) -> IstanbulResult<CeloHeader> {
    let message = signing_message(header)?;
    let (recovery_id, compact) =
        SECP256K1.sign_ecdsa_recoverable(&message, secret_key).serialize_compact();

    let mut seal = Vec::with_capacity(ISTANBUL_EXTRA_SEAL);
    seal.extend_from_slice(&compact);
    seal.push(recovery_id.to_i32() as u8);

    let mut extra = header.istanbul_extra().map_err(IstanbulError::InvalidExtraData)?;
    extra.seal = seal.into();

    let mut sealed = header.clone();
    sealed.extra = extra.to_header_extra(&header.vanity());
    Ok(sealed)
}

/// Returns the address controlled by `public_key`.
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Skip the 0x04 prefix and take the last 20 bytes of the hash
    let hash = keccak256(&public_key.serialize_uncompressed()[1..]);
    Address::from_slice(&hash[12..])
}

fn signing_message(header: &CeloHeader) -> IstanbulResult<Message> {
    let digest = keccak256(sig_hash(header)?);
    Message::from_digest_slice(digest.as_slice()).map_err(|_| IstanbulError::InvalidSignatureFormat)
}
