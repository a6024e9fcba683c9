//! Celo block header, Istanbul-era layout.

use crate::extra::{vanity_of, IstanbulAggregatedSeal, IstanbulExtra};
use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256};
use alloy_rlp::{Encodable, Header as RlpHeader};
use serde::{Deserialize, Serialize};

/// Celo block header as returned by `eth_getBlockByNumber`.
///
/// Celo dropped the proof-of-work fields (ommers, difficulty, gas limit, mix
/// hash, nonce) from the Ethereum header. RLP encoding order:
///
/// `parent_hash, coinbase, state_root, tx_hash, receipt_hash, logs_bloom,
/// number, gas_used, time, extra`
///
/// The node-reported `hash` is carried alongside for integrity checks and is
/// not part of the encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeloHeader {
    /// The Keccak 256-bit hash of the parent block's header.
    pub parent_hash: B256,
    /// Address credited with the block's transaction fees.
    #[serde(rename = "miner")]
    pub coinbase: Address,
    /// State trie root after executing the block.
    pub state_root: B256,
    /// Transactions trie root.
    #[serde(rename = "transactionsRoot")]
    pub tx_hash: B256,
    /// Receipts trie root.
    #[serde(rename = "receiptsRoot")]
    pub receipt_hash: B256,
    /// Bloom filter over the block's logs.
    pub logs_bloom: Bloom,
    /// Block number.
    #[serde(with = "alloy_serde::quantity")]
    pub number: u64,
    /// Gas used by the block's transactions.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    /// Block timestamp.
    #[serde(rename = "timestamp", with = "alloy_serde::quantity")]
    pub time: u64,
    /// Vanity prefix followed by the RLP encoded [`IstanbulExtra`].
    #[serde(rename = "extraData")]
    pub extra: Bytes,
    /// Hash reported by the node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<B256>,
}

impl CeloHeader {
    /// Returns the 32 byte vanity prefix of `extra`.
    pub fn vanity(&self) -> [u8; 32] {
        vanity_of(&self.extra)
    }

    /// Decodes the Istanbul payload of `extra`.
    pub fn istanbul_extra(&self) -> alloy_rlp::Result<IstanbulExtra> {
        IstanbulExtra::from_header_extra(&self.extra)
    }

    /// Returns a copy of the header with the aggregated seal removed from the
    /// extra data, and the proposer seal too unless `keep_seal` is set.
    ///
    /// With `keep_seal = false` this is the payload the proposer signs; with
    /// `keep_seal = true` it is the payload the block hash commits to.
    pub fn istanbul_filtered(&self, keep_seal: bool) -> alloy_rlp::Result<Self> {
        let mut extra = self.istanbul_extra()?;
        if !keep_seal {
            extra.seal = Bytes::new();
        }
        extra.aggregated_seal = IstanbulAggregatedSeal::default();

        let mut filtered = self.clone();
        filtered.extra = extra.to_header_extra(&self.vanity());
        Ok(filtered)
    }

    /// Computes the block hash via keccak256.
    ///
    /// Istanbul block hashes exclude the aggregated seal so that every
    /// validator derives the same hash regardless of which commits it saw.
    /// Headers whose extra does not decode are hashed as they are.
    pub fn hash_slow(&self) -> B256 {
        let mut buf = Vec::new();
        match self.istanbul_filtered(true) {
            Ok(filtered) => filtered.encode(&mut buf),
            Err(_) => self.encode(&mut buf),
        }
        keccak256(&buf)
    }

    fn payload_length(&self) -> usize {
        self.parent_hash.length() +
            self.coinbase.length() +
            self.state_root.length() +
            self.tx_hash.length() +
            self.receipt_hash.length() +
            self.logs_bloom.length() +
            self.number.length() +
            self.gas_used.length() +
            self.time.length() +
            self.extra.length()
    }
}

impl Encodable for CeloHeader {
    fn encode(&self, out: &mut dyn alloy_primitives::bytes::BufMut) {
        RlpHeader { list: true, payload_length: self.payload_length() }.encode(out);
        self.parent_hash.encode(out);
        self.coinbase.encode(out);
        self.state_root.encode(out);
        self.tx_hash.encode(out);
        self.receipt_hash.encode(out);
        self.logs_bloom.encode(out);
        self.number.encode(out);
        self.gas_used.encode(out);
        self.time.encode(out);
        self.extra.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}
