use axum::{
    routing::{any_service, get, post},
    Router,
};
use std::sync::Arc;

use crate::infra::runtime::mcp_transport::{make_streamable_http_service, LocalSessionManager};
use crate::tools::characters::tool_router::{CharacterRouter, CharacterSvc};
use crate::tools::registry::ToolRegistry;

/// `/healthz` + streamable MCP at `/mcp`.
pub fn build_app<F>(factory: F) -> Router
where
    F: Fn() -> (CharacterSvc, CharacterRouter) + Send + Sync + Clone + 'static,
{
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = make_streamable_http_service(factory, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}

/// [`build_app`] **plus** the JSON-RPC REST shim at `/v1/rpc`.
pub fn build_app_with_rest<F>(factory: F, registry: ToolRegistry) -> Router
where
    F: Fn() -> (CharacterSvc, CharacterRouter) + Send + Sync + Clone + 'static,
{
    let rest = Router::new()
        .route("/v1/rpc", post(crate::api::mcp::http))
        .with_state(registry);
    build_app(factory).merge(rest)
}
