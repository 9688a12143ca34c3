use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::foundry::ActorQuery;
use crate::core::error::GatewayError;
use crate::core::tool::Tool;
use crate::tools::characters::{CharacterTools, GetCharacterTool, ListCharactersTool};

/// Name-indexed tools for the JSON-RPC REST shim.
#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<HashMap<&'static str, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let map: HashMap<&'static str, Arc<dyn Tool>> =
            iter.into_iter().map(|t| (t.name(), t)).collect();
        Self { by_name: Arc::new(map) }
    }

    /// Registry holding `get-character` and `list-characters`.
    pub fn for_query(query: Arc<dyn ActorQuery>) -> Self {
        let tools = CharacterTools::new(query);
        Self::with_tools([
            Arc::new(GetCharacterTool(tools.clone())) as Arc<dyn Tool>,
            Arc::new(ListCharactersTool(tools)) as Arc<dyn Tool>,
        ])
    }

    /// Tool metadata sorted by name.
    pub fn list(&self) -> Vec<ToolMeta> {
        let mut metas: Vec<ToolMeta> = self
            .by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub async fn call(&self, name: &str, args: &serde_json::Value) -> Result<serde_json::Value, GatewayError> {
        let t = self
            .by_name
            .get(name)
            .ok_or_else(|| GatewayError::UnknownTool(name.to_owned()))?;
        t.call(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}
