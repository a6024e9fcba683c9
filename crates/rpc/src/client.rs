//! Blocking JSON-RPC client over HTTP.

use crate::{
    errors::{RpcError, RpcResult},
    source::{HeaderSource, LookbackWindowSource},
    types::Quantity,
};
use alloy_eips::BlockNumberOrTag;
use alloy_json_rpc::{ErrorPayload, Id, Request, Response, ResponsePayload, RpcSend};
use donut_primitives::CeloHeader;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};
use url::Url;

/// JSON-RPC client for a Celo node's HTTP endpoint.
///
/// Every call blocks until the node answers; the transport's default timeout
/// applies and nothing is retried.
#[derive(Debug)]
pub struct HttpClient {
    url: Url,
    client: Client,
    next_id: AtomicU64,
}

impl HttpClient {
    /// Creates a client for `url`. Only `http` and `https` endpoints are
    /// supported.
    pub fn new(url: Url) -> RpcResult<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RpcError::UnsupportedScheme(url.scheme().to_string()));
        }
        let client = Client::builder().build()?;
        debug!(%url, "Created RPC client");
        Ok(Self { url, client, next_id: AtomicU64::new(1) })
    }

    /// Returns the endpoint this client talks to.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Calls `method` with positional `params` and decodes the result.
    pub fn request<P, R>(&self, method: &'static str, params: P) -> RpcResult<R>
    where
        P: RpcSend,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        trace!(method, id, "Sending RPC request");

        let response: Response = self
            .client
            .post(self.url.clone())
            .json(&Request::new(method, Id::Number(id), params))
            .send()?
            .error_for_status()?
            .json()?;

        decode_response(method, response)
    }

    fn block_header(&self, block: BlockNumberOrTag) -> RpcResult<Option<CeloHeader>> {
        let header: Option<CeloHeader> = self.request("eth_getBlockByNumber", (block, false))?;
        if let Some(header) = &header {
            check_reported_hash(header);
        }
        Ok(header)
    }
}

impl HeaderSource for HttpClient {
    fn latest_header(&self) -> RpcResult<CeloHeader> {
        self.block_header(BlockNumberOrTag::Latest)?.ok_or(RpcError::LatestNotFound)
    }

    fn header_by_number(&self, number: u64) -> RpcResult<CeloHeader> {
        self.block_header(BlockNumberOrTag::Number(number))?.ok_or(RpcError::BlockNotFound(number))
    }
}

impl LookbackWindowSource for HttpClient {
    fn lookback_window(&self, number: u64) -> RpcResult<u64> {
        let value: Quantity =
            self.request("istanbul_getLookbackWindow", [BlockNumberOrTag::Number(number)])?;
        Ok(value.into())
    }
}

/// Turns a response envelope into the call's result.
pub(crate) fn decode_response<R: DeserializeOwned>(
    method: &'static str,
    response: Response,
) -> RpcResult<R> {
    match response.payload {
        ResponsePayload::Success(result) => serde_json::from_str(result.get())
            .map_err(|source| RpcError::Decode { method, source }),
        ResponsePayload::Failure(ErrorPayload { code, message, .. }) => {
            Err(RpcError::Rpc { code, message: message.into_owned() })
        }
    }
}

/// Logs a warning if the node's hash differs from the one computed locally,
/// which means the node serves a header layout this crate does not model.
fn check_reported_hash(header: &CeloHeader) {
    let Some(reported) = header.hash else { return };
    let computed = header.hash_slow();
    if computed != reported {
        warn!(
            block_number = header.number,
            %reported,
            %computed,
            "Header hash mismatch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn response(json: &str) -> Response {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let url = Url::parse("ws://localhost:8546").unwrap();
        assert_matches!(HttpClient::new(url), Err(RpcError::UnsupportedScheme(scheme)) if scheme == "ws");
    }

    #[test]
    fn test_accepts_http_endpoint() {
        let url = Url::parse("http://localhost:8545/").unwrap();
        let client = HttpClient::new(url.clone()).unwrap();
        assert_eq!(client.url(), &url);
    }

    #[test]
    fn test_request_encoding() {
        let request =
            Request::new("istanbul_getLookbackWindow", Id::Number(7), [BlockNumberOrTag::Number(16)]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "istanbul_getLookbackWindow",
                "params": ["0x10"],
            })
        );

        let request = Request::new("eth_getBlockByNumber", Id::Number(8), (BlockNumberOrTag::Latest, false));
        assert_eq!(serde_json::to_value(&request).unwrap()["params"], serde_json::json!(["latest", false]));
    }

    #[test]
    fn test_decode_result() {
        let value: Quantity =
            decode_response("istanbul_getLookbackWindow", response(r#"{"jsonrpc":"2.0","id":1,"result":12}"#))
                .unwrap();
        assert_eq!(u64::from(value), 12);
    }

    #[test]
    fn test_decode_null_header() {
        let header: Option<CeloHeader> =
            decode_response("eth_getBlockByNumber", response(r#"{"jsonrpc":"2.0","id":1,"result":null}"#)).unwrap();
        assert!(header.is_none());
    }

    #[test]
    fn test_decode_rpc_error() {
        let result: RpcResult<u64> = decode_response(
            "istanbul_getLookbackWindow",
            response(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"unknown block"}}"#),
        );
        assert_matches!(result, Err(RpcError::Rpc { code: -32000, message }) if message == "unknown block");
    }

    #[test]
    fn test_decode_wrong_shape() {
        let result: RpcResult<Quantity> =
            decode_response("istanbul_getLookbackWindow", response(r#"{"jsonrpc":"2.0","id":1,"result":"soon"}"#));
        assert_matches!(result, Err(RpcError::Decode { method: "istanbul_getLookbackWindow", .. }));
    }
}
