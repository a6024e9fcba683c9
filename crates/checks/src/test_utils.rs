//! In-memory node and signing helpers for testing checks.

use alloy_primitives::{Address, B256};
use donut_consensus_istanbul::{
    seal::{public_key_to_address, seal_header},
    IstanbulError, IstanbulResult, SignerRecovery,
};
use donut_primitives::{CeloHeader, IstanbulExtra};
use donut_rpc::{HeaderSource, LookbackWindowSource, RpcError, RpcResult};
use secp256k1::{PublicKey, SecretKey};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

/// Error code returned for injected failures.
pub const MOCK_ERROR_CODE: i64 = -32000;

/// Node serving a fixed set of headers and lookback window values.
///
/// Every block number requested through [`HeaderSource::header_by_number`] or
/// [`LookbackWindowSource::lookback_window`] is recorded, in order.
#[derive(Debug, Default)]
pub struct MockNode {
    latest: u64,
    headers: BTreeMap<u64, CeloHeader>,
    lookback_windows: BTreeMap<u64, u64>,
    failing: BTreeSet<u64>,
    fetched: RefCell<Vec<u64>>,
}

impl MockNode {
    /// Creates a node whose chain head is block `latest`.
    pub fn new(latest: u64) -> Self {
        Self { latest, ..Default::default() }
    }

    /// Adds a header, keyed by its number.
    pub fn with_header(mut self, header: CeloHeader) -> Self {
        self.headers.insert(header.number, header);
        self
    }

    /// Adds all `headers`.
    pub fn with_headers(self, headers: impl IntoIterator<Item = CeloHeader>) -> Self {
        headers.into_iter().fold(self, Self::with_header)
    }

    /// Sets the lookback window reported at `block`.
    pub fn with_lookback_window(mut self, block: u64, value: u64) -> Self {
        self.lookback_windows.insert(block, value);
        self
    }

    /// Makes every request for `block` fail with an RPC error.
    pub fn fail_at(mut self, block: u64) -> Self {
        self.failing.insert(block);
        self
    }

    /// Block numbers requested so far.
    pub fn fetched(&self) -> Vec<u64> {
        self.fetched.borrow().clone()
    }

    fn record(&self, block: u64) -> RpcResult<()> {
        self.fetched.borrow_mut().push(block);
        if self.failing.contains(&block) {
            return Err(RpcError::Rpc { code: MOCK_ERROR_CODE, message: "injected failure".into() });
        }
        Ok(())
    }
}

impl HeaderSource for MockNode {
    fn latest_header(&self) -> RpcResult<CeloHeader> {
        Ok(self
            .headers
            .get(&self.latest)
            .cloned()
            .unwrap_or_else(|| CeloHeader { number: self.latest, ..Default::default() }))
    }

    fn header_by_number(&self, number: u64) -> RpcResult<CeloHeader> {
        self.record(number)?;
        self.headers.get(&number).cloned().ok_or(RpcError::BlockNotFound(number))
    }
}

impl LookbackWindowSource for MockNode {
    fn lookback_window(&self, number: u64) -> RpcResult<u64> {
        self.record(number)?;
        self.lookback_windows.get(&number).copied().ok_or_else(|| RpcError::Rpc {
            code: MOCK_ERROR_CODE,
            message: format!("no lookback window for block {number}"),
        })
    }
}

/// Validator signing key.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorKey {
    secret_key: SecretKey,
    address: Address,
}

impl ValidatorKey {
    /// Derives a key from a non-zero `seed`.
    pub fn from_seed(seed: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[31] = seed;
        let secret_key = SecretKey::from_slice(&bytes).expect("non-zero seed");
        let address = public_key_to_address(&PublicKey::from_secret_key_global(&secret_key));
        Self { secret_key, address }
    }

    /// Address the key signs as.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns `header` sealed by this key.
    pub fn seal(&self, header: &CeloHeader) -> CeloHeader {
        seal_header(header, &self.secret_key).expect("header has valid extra")
    }
}

/// Returns an unsealed header with an empty Istanbul extra.
pub fn unsealed_header(number: u64, coinbase: Address) -> CeloHeader {
    CeloHeader {
        parent_hash: B256::with_last_byte(number as u8),
        coinbase,
        number,
        gas_used: 21_000,
        time: 1_600_000_000 + number * 5,
        extra: IstanbulExtra::default().to_header_extra(&[0u8; 32]),
        ..Default::default()
    }
}

/// Returns header `number` with `coinbase`, sealed by `key`.
pub fn signed_header(number: u64, coinbase: Address, key: &ValidatorKey) -> CeloHeader {
    key.seal(&unsealed_header(number, coinbase))
}

/// [`SignerRecovery`] returning a preset author per block number.
///
/// Blocks without an entry fail as if their seal were malformed.
#[derive(Debug, Clone, Default)]
pub struct FixedRecovery {
    authors: BTreeMap<u64, Address>,
}

impl FixedRecovery {
    /// Sets the author of `block`.
    pub fn with_author(mut self, block: u64, author: Address) -> Self {
        self.authors.insert(block, author);
        self
    }
}

impl SignerRecovery for FixedRecovery {
    fn recover_author(&self, header: &CeloHeader) -> IstanbulResult<Address> {
        self.authors.get(&header.number).copied().ok_or(IstanbulError::InvalidSignatureFormat)
    }
}
