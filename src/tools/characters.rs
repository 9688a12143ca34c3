//! Character lookup and listing on top of an [`ActorQuery`] collaborator.

pub mod tool_router;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::foundry::{ActorQuery, GET_CHARACTER_INFO, LIST_ACTORS};
use crate::core::error::{GatewayError, QueryError};
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::{summarize, ActorRecord, CharacterList, CharacterSummary};

pub const GET_CHARACTER: &str = "get-character";
pub const LIST_CHARACTERS: &str = "list-characters";

#[derive(Clone)]
pub struct CharacterTools {
    query: Arc<dyn ActorQuery>,
}

impl CharacterTools {
    pub fn new(query: Arc<dyn ActorQuery>) -> Self {
        Self { query }
    }

    /// Fetch one actor by name or id and summarize it.
    pub async fn lookup_character(&self, identifier: &str) -> Result<CharacterSummary, GatewayError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(GatewayError::Validation("identifier must be a non-empty string".into()));
        }
        tracing::info!(identifier, "get-character start");
        let target = format!("character '{identifier}'");

        let raw = self
            .query
            .query(GET_CHARACTER_INFO, json!({ "characterName": identifier }))
            .await
            .map_err(|e| {
                tracing::error!(identifier, error = %e, "get-character failed");
                GatewayError::lookup(&target, e)
            })?;
        let record = decode_actor(raw, GET_CHARACTER_INFO).map_err(|e| {
            tracing::warn!(identifier, error = %e, "get-character returned no record");
            GatewayError::lookup(&target, e)
        })?;

        let summary = summarize(&record);
        tracing::info!(
            identifier,
            actor = %summary.id,
            items = summary.items.len(),
            effects = summary.effects.len(),
            "get-character ok"
        );
        Ok(summary)
    }

    /// List actors, optionally filtered by actor type on the host side.
    pub async fn list_characters(&self, type_filter: Option<&str>) -> Result<CharacterList, GatewayError> {
        let type_filter = type_filter.map(str::trim).filter(|t| !t.is_empty());
        tracing::info!(type_filter = ?type_filter, "list-characters start");
        let params = match type_filter {
            Some(t) => json!({ "type": t }),
            None => json!({}),
        };

        let raw = self.query.query(LIST_ACTORS, params).await.map_err(|e| {
            tracing::error!(type_filter = ?type_filter, error = %e, "list-characters failed");
            GatewayError::lookup("actor list", e)
        })?;
        let Value::Array(entries) = raw else {
            tracing::warn!("list-characters got a non-array response");
            return Err(GatewayError::lookup(
                "actor list",
                QueryError::Decode("expected an array of actors".into()),
            ));
        };
        let received = entries.len();
        let records: Vec<ActorRecord> = entries
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if records.len() < received {
            tracing::warn!(
                dropped = received - records.len(),
                received,
                "list-characters skipped undecodable actors"
            );
        }

        let list = CharacterList::new(&records, type_filter);
        tracing::info!(total = list.total, "list-characters ok");
        Ok(list)
    }
}

fn decode_actor(raw: Value, operation: &str) -> Result<ActorRecord, QueryError> {
    if !raw.is_object() {
        return Err(QueryError::Empty {
            operation: operation.to_owned(),
        });
    }
    serde_json::from_value(raw).map_err(|e| QueryError::Decode(e.to_string()))
}

/// Pull the identifier out of tool arguments. `characterName` is accepted
/// for older clients.
pub fn identifier_arg(args: &Value) -> Result<&str, GatewayError> {
    match args.get("identifier").or_else(|| args.get("characterName")) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(GatewayError::Validation("identifier must be a string".into())),
        None => Err(GatewayError::Validation("missing required field: identifier".into())),
    }
}

pub fn type_arg(args: &Value) -> Result<Option<&str>, GatewayError> {
    match args.get("type") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(GatewayError::Validation("type must be a string".into())),
    }
}

pub fn get_character_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "identifier": {
                "type": "string",
                "minLength": 1,
                "description": "Character name or actor id"
            }
        },
        "required": ["identifier"]
    })
}

pub fn list_characters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": {
                "type": "string",
                "description": "Only list actors of this type (e.g. 'character', 'npc')"
            }
        }
    })
}

pub struct GetCharacterTool(pub CharacterTools);

impl ToolSpec for GetCharacterTool {
    fn name(&self) -> &'static str {
        GET_CHARACTER
    }
    fn description(&self) -> &'static str {
        "Look up a character by name or id and return a compact summary (basic info, stats, items, effects)"
    }
    fn input_schema(&self) -> Value {
        get_character_schema()
    }
}

#[async_trait]
impl Tool for GetCharacterTool {
    async fn call(&self, arguments: &Value) -> Result<Value, GatewayError> {
        let identifier = identifier_arg(arguments)?;
        let summary = self.0.lookup_character(identifier).await?;
        Ok(json!(summary))
    }
}

pub struct ListCharactersTool(pub CharacterTools);

impl ToolSpec for ListCharactersTool {
    fn name(&self) -> &'static str {
        LIST_CHARACTERS
    }
    fn description(&self) -> &'static str {
        "List actors in the world, optionally filtered by actor type"
    }
    fn input_schema(&self) -> Value {
        list_characters_schema()
    }
}

#[async_trait]
impl Tool for ListCharactersTool {
    async fn call(&self, arguments: &Value) -> Result<Value, GatewayError> {
        let type_filter = type_arg(arguments)?;
        let list = self.0.list_characters(type_filter).await?;
        Ok(json!(list))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// In-memory query stub that records every call it receives.
    #[derive(Default)]
    pub struct StubQuery {
        pub responses: Mutex<Vec<Result<Value, QueryError>>>,
        pub calls: Mutex<Vec<(String, Value)>>,
    }

    impl StubQuery {
        pub fn returning(v: Value) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![Ok(v)]),
                ..Self::default()
            })
        }

        pub fn failing(e: QueryError) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![Err(e)]),
                ..Self::default()
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ActorQuery for StubQuery {
        async fn query(&self, operation: &str, params: Value) -> Result<Value, QueryError> {
            self.calls.lock().unwrap().push((operation.to_owned(), params));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(Value::Null))
        }
    }
}
