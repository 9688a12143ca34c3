use thiserror::Error;

/// Failure of a single call to the VTT host's query bridge.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query bridge not configured; set FOUNDRY_BASE_URL")]
    NotConfigured,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{operation} returned no usable record")]
    Empty { operation: String },
}

impl QueryError {
    /// Only server-side and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            QueryError::Transport(_) => true,
            QueryError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Gateway-wide error model. Callers match on the variant instead of
/// inspecting messages.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("failed to retrieve {target}: {source}")]
    Lookup {
        target: String,
        #[source]
        source: QueryError,
    },
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl GatewayError {
    pub fn lookup(target: impl Into<String>, source: QueryError) -> Self {
        GatewayError::Lookup {
            target: target.into(),
            source,
        }
    }

    /// JSON-RPC error code used by the REST shim.
    pub fn rpc_code(&self) -> i32 {
        match self {
            GatewayError::Validation(_) => -32602,
            _ => -32000,
        }
    }
}

impl From<GatewayError> for rmcp::ErrorData {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Validation(msg) => rmcp::ErrorData::invalid_params(msg, None),
            other => rmcp::ErrorData::internal_error(other.to_string(), None),
        }
    }
}
