use std::net::SocketAddr;
use std::sync::Arc;

use crate::clients::foundry::{ActorQuery, FoundryRemote};
use crate::infra::config::{AppConfig, Config};
use crate::tools::characters::tool_router::factory_with_query;
use crate::tools::registry::ToolRegistry;

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    let app_cfg = AppConfig::from_env_and_toml();
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        deprecate_rest = cfg.deprecate_rest,
        foundry = app_cfg.foundry.base_url.as_deref().unwrap_or("<unset>"),
        "BOOT vtt-character-gateway"
    );

    let remote = FoundryRemote::from_config(&app_cfg.foundry);
    if !remote.is_configured() {
        tracing::warn!("FOUNDRY_BASE_URL not configured; character tools will return errors");
    }
    let query: Arc<dyn ActorQuery> = Arc::new(remote);
    let factory = {
        let query = query.clone();
        move || factory_with_query(query.clone())
    };

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.mode == "stdio" {
        crate::infra::runtime::mcp_transport::serve_stdio(factory)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let app = if cfg.deprecate_rest {
        crate::infra::http_app::build_app(factory)
    } else {
        crate::infra::http_app::build_app_with_rest(factory, ToolRegistry::for_query(query))
    };

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
