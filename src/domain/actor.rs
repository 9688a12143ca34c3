//! Raw actor records as returned by the VTT host's query bridge.

use serde::Deserialize;
use serde_json::Value;

use super::de;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorRecord {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "de::string_or_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::text")]
    pub img: Option<String>,
    /// Game-system payload; its shape depends on the rule family.
    #[serde(default)]
    pub system: Option<Value>,
    #[serde(default, deserialize_with = "de::records")]
    pub items: Vec<ItemRecord>,
    #[serde(default, deserialize_with = "de::records")]
    pub effects: Vec<EffectRecord>,
}

impl ActorRecord {
    pub fn has_image(&self) -> bool {
        self.img.is_some()
    }

    /// Looks up a nested field of `system` by path.
    pub fn system_field(&self, path: &[&str]) -> Option<&Value> {
        let mut cur = self.system.as_ref()?;
        for key in path {
            cur = cur.as_object()?.get(*key)?;
        }
        (!cur.is_null()).then_some(cur)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRecord {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "de::string_or_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::text")]
    pub img: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub system: Option<ItemSystem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemSystem {
    #[serde(default, deserialize_with = "de::number_or_value")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "de::text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectRecord {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    /// Older hosts name effects through `label`.
    #[serde(default, deserialize_with = "de::text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub disabled: Option<bool>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub duration: Option<EffectDuration>,
    #[serde(default, deserialize_with = "de::text")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectDuration {
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub remaining: Option<i64>,
}
