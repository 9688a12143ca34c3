use axum::Json;

use crate::core::error::GatewayError;
use crate::core::mcp::{err as rpc_err, ok as rpc_ok, RpcResp};

pub fn ok(id: serde_json::Value, result: serde_json::Value) -> Json<RpcResp> {
    Json(rpc_ok(id, result))
}

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

/// Map a GatewayError onto its JSON-RPC code (-32602 for bad input,
/// -32000 for everything upstream).
pub fn from_gateway_error(id: serde_json::Value, err: &GatewayError) -> Json<RpcResp> {
    error(id, err.rpc_code(), err.to_string())
}
