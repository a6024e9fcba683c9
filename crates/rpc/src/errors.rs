//! RPC errors

/// Errors returned while talking to a node
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Endpoint URL is not HTTP(S)
    #[error("unsupported RPC endpoint scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    /// Request could not be sent or the response could not be read
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the node.
        message: String,
    },

    /// Result does not have the expected shape
    #[error("failed to decode `{method}` result")]
    Decode {
        /// Method that was called.
        method: &'static str,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// Node does not know the requested block
    #[error("block {0} not found")]
    BlockNotFound(u64),

    /// Node returned no chain head
    #[error("latest block not found")]
    LatestNotFound,
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;
