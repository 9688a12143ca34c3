use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::JsonObject;

use super::{identifier_arg, type_arg, CharacterTools};
use crate::clients::foundry::ActorQuery;
use crate::infra::runtime::mcp_transport::ServerHandler;

#[derive(Clone)]
pub struct CharacterSvc {
    pub tools: CharacterTools,
}

impl ServerHandler for CharacterSvc {}

#[rmcp::tool_router]
impl CharacterSvc {
    #[rmcp::tool(
        name = "get-character",
        description = "Look up a character by name or id ({\"identifier\": string}) and return a compact summary"
    )]
    async fn get_character(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, rmcp::ErrorData> {
        let args = serde_json::Value::Object(params.0);
        let identifier = identifier_arg(&args)?;
        let summary = self.tools.lookup_character(identifier).await?;
        Ok(rmcp::Json(serde_json::json!(summary)))
    }

    #[rmcp::tool(
        name = "list-characters",
        description = "List actors, optionally filtered by actor type ({\"type\": string})"
    )]
    async fn list_characters(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, rmcp::ErrorData> {
        let args = serde_json::Value::Object(params.0);
        let type_filter = type_arg(&args)?;
        let list = self.tools.list_characters(type_filter).await?;
        Ok(rmcp::Json(serde_json::json!(list)))
    }
}

pub type CharacterRouter = ToolRouter<CharacterSvc>;

impl CharacterSvc {
    pub fn new(query: Arc<dyn ActorQuery>) -> Self {
        Self {
            tools: CharacterTools::new(query),
        }
    }

    pub fn router() -> CharacterRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}

/// `(handler, router)` pair as required by the rmcp transports.
pub fn factory_with_query(query: Arc<dyn ActorQuery>) -> (CharacterSvc, CharacterRouter) {
    (CharacterSvc::new(query), CharacterSvc::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::QueryError;
    use crate::tools::characters::testing::StubQuery;
    use serde_json::json;

    fn params(v: serde_json::Value) -> Parameters<JsonObject> {
        Parameters(v.as_object().unwrap().clone())
    }

    #[test]
    fn router_lists_both_tools() {
        let names: Vec<String> = CharacterSvc::router()
            .into_iter()
            .map(|r| r.name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "get-character"), "got: {:?}", names);
        assert!(names.iter().any(|n| n == "list-characters"), "got: {:?}", names);
    }

    #[tokio::test]
    async fn missing_identifier_is_invalid_params() {
        let stub = StubQuery::returning(json!({}));
        let svc = CharacterSvc::new(stub.clone());
        let err = match svc.get_character(params(json!({}))).await {
            Err(e) => e,
            Ok(_) => panic!("expected invalid params error, got Ok"),
        };
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("missing required field: identifier"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_identifier_is_invalid_params() {
        let svc = CharacterSvc::new(StubQuery::returning(json!({})));
        let err = match svc.get_character(params(json!({"identifier": ""}))).await {
            Err(e) => e,
            Ok(_) => panic!("expected invalid params error, got Ok"),
        };
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn get_character_returns_summary_json() {
        let svc = CharacterSvc::new(StubQuery::returning(json!({
            "id": "c1", "name": "Mira", "type": "character",
            "system": {"attributes": {"hp": {"value": 5, "max": 20}}, "details": {"level": {"value": 3}}}
        })));
        let rmcp::Json(v) = svc
            .get_character(params(json!({"identifier": "Mira"})))
            .await
            .expect("tool should succeed");
        assert_eq!(v["basicInfo"], json!({"hitPoints": {"current": 5, "max": 20, "temp": 0}, "level": 3}));
    }

    #[tokio::test]
    async fn lookup_failure_is_internal_error() {
        let svc = CharacterSvc::new(StubQuery::failing(QueryError::NotConfigured));
        let err = match svc.get_character(params(json!({"identifier": "Mira"}))).await {
            Err(e) => e,
            Ok(_) => panic!("expected lookup error, got Ok"),
        };
        assert_eq!(err.code.0, -32603);
        assert!(err.message.contains("Mira"));
    }

    #[tokio::test]
    async fn list_characters_returns_projection() {
        let svc = CharacterSvc::new(StubQuery::returning(json!([{"id": "n1", "name": "Goblin", "type": "npc"}])));
        let rmcp::Json(v) = svc
            .list_characters(params(json!({"type": "npc"})))
            .await
            .expect("tool should succeed");
        assert_eq!(v["total"], 1);
        assert_eq!(v["filtered"], "Filtered by type: npc");
    }

    #[test]
    fn server_handler_trait_impl() {
        fn assert_server_handler<T: ServerHandler>(_handler: T) {}
        assert_server_handler(CharacterSvc::new(StubQuery::returning(json!({}))));
    }
}
