//! MCP transports (stdio + streamable HTTP) for any rmcp tool handler.

use std::sync::Arc;

use rmcp::handler::server::router::Router;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::serve_server;
use rmcp::transport::streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService};

pub use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
pub use rmcp::ServerHandler;

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio<H>(factory: impl FnOnce() -> (H, ToolRouter<H>)) -> Result<(), TransportError>
where
    H: ServerHandler,
{
    let (handler, tools) = factory();
    let service = Router::new(handler).with_tools(tools);
    tracing::info!("serving MCP over stdio");
    let running = serve_server(service, (tokio::io::stdin(), tokio::io::stdout())).await?;
    let reason = running.waiting().await?;
    tracing::info!(reason = ?reason, "stdio session ended");
    Ok(())
}

/// Streamable HTTP service; each new session gets a fresh `(handler, tools)` pair.
pub fn make_streamable_http_service<H>(
    factory: impl Fn() -> (H, ToolRouter<H>) + Send + Sync + Clone + 'static,
    session_mgr: Arc<LocalSessionManager>,
) -> StreamableHttpService<Router<H>, LocalSessionManager>
where
    H: ServerHandler,
{
    let cfg = StreamableHttpServerConfig::default();
    tracing::debug!(stateful_mode = %cfg.stateful_mode, keep_alive = ?cfg.sse_keep_alive, "streamable http config");
    let service_factory = move || {
        let (handler, tools) = factory();
        tracing::debug!("building MCP session router");
        Ok(Router::new(handler).with_tools(tools))
    };
    StreamableHttpService::new(service_factory, session_mgr, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::characters::testing::StubQuery;
    use crate::tools::characters::tool_router::{factory_with_query, CharacterSvc};

    #[tokio::test]
    async fn builds_streamable_http_service_for_character_tools() {
        let session_mgr = Arc::new(LocalSessionManager::default());
        let factory = || factory_with_query(StubQuery::returning(serde_json::json!([])));
        let _service = make_streamable_http_service(factory, session_mgr);
    }

    #[test]
    fn factory_yields_handler_and_router() {
        let (_svc, tools): (CharacterSvc, _) =
            factory_with_query(StubQuery::returning(serde_json::Value::Null));
        assert_eq!(tools.into_iter().count(), 2);
    }
}
