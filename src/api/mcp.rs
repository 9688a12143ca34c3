//! JSON-RPC REST shim over the tool registry (`POST /v1/rpc`).

use axum::Json;
use serde_json::{json, Value as J};

use crate::core::error::GatewayError;
use crate::core::mcp::{InitializeResult, RpcReq, RpcResp};
use crate::infra::http::json as http_json;
use crate::tools::registry::ToolRegistry;

fn tools_list(reg: &ToolRegistry) -> J {
    let tools: Vec<J> = reg
        .list()
        .into_iter()
        .map(|t| json!({ "name": t.name, "description": t.description, "inputSchema": t.input_schema }))
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(reg: &ToolRegistry, params: &J) -> Result<J, GatewayError> {
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GatewayError::Validation("missing tool name".into()))?;
    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    reg.call(name, &args).await
}

pub async fn http(
    axum::extract::State(reg): axum::extract::State<ToolRegistry>,
    Json(req): Json<RpcReq>,
) -> Json<RpcResp> {
    tracing::debug!(method = %req.method, id = ?req.id, "rpc request");
    let id = req.id.clone();
    let resp = match req.method.as_str() {
        "initialize" => http_json::ok(id, json!(InitializeResult::for_this_server())).0,
        "shutdown" => http_json::ok(id, J::Null).0,
        "tools.list" | "tools/list" => http_json::ok(id, tools_list(&reg)).0,
        "tools.call" | "tools/call" => match call_tool(&reg, &req.params).await {
            Ok(out) => http_json::ok(id, out).0,
            Err(e) => {
                tracing::warn!(error = %e, "tools/call failed");
                http_json::from_gateway_error(id, &e).0
            }
        },
        _ => http_json::error(id, -32601, format!("unknown method: {}", req.method)).0,
    };
    Json(resp)
}
