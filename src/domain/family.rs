//! Game-rule family detection and the typed per-family system payloads.
//!
//! The host stores rule data under `system` with a shape chosen by the game
//! system. Two families are understood:
//!
//! - characteristic based: percentile characteristics, wounds and armour
//!   locations (`characteristics`, `status.wounds`)
//! - attribute based: hit points, armor class, ability scores and levels
//!   (`attributes`, `abilities`)
//!
//! A record is decoded once into [`SystemData`] and that value feeds every
//! extraction step.

use serde::{Deserialize, Serialize};

use super::actor::ActorRecord;
use super::de;
use super::entries::Entries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameFamily {
    CharacteristicBased,
    AttributeBased,
}

/// Classify a record from its field markers. Records with neither marker
/// set default to [`GameFamily::AttributeBased`].
pub fn detect_family(record: &ActorRecord) -> GameFamily {
    let characteristic_markers = record.system_field(&["characteristics"]).is_some()
        || record.system_field(&["status", "wounds"]).is_some();
    if characteristic_markers {
        GameFamily::CharacteristicBased
    } else {
        GameFamily::AttributeBased
    }
}

/// Outcome of decoding `system` against the known family schemas.
#[derive(Debug, Clone)]
pub enum SystemData {
    CharacteristicBased(CharacteristicSystem),
    AttributeBased(AttributeSystem),
    Unrecognized,
}

impl SystemData {
    pub fn decode(record: &ActorRecord) -> Self {
        let Some(system) = record.system.as_ref().filter(|v| v.is_object()) else {
            return SystemData::Unrecognized;
        };
        // Field decoders are lenient, so any object decodes under the detected family.
        let decoded = match detect_family(record) {
            GameFamily::CharacteristicBased => {
                CharacteristicSystem::deserialize(system).map(SystemData::CharacteristicBased)
            }
            GameFamily::AttributeBased => AttributeSystem::deserialize(system).map(SystemData::AttributeBased),
        };
        decoded.unwrap_or_else(|e| {
            tracing::debug!(actor = %record.id, error = %e, "system payload matched no known family");
            SystemData::Unrecognized
        })
    }

    pub fn family(&self) -> Option<GameFamily> {
        match self {
            SystemData::CharacteristicBased(_) => Some(GameFamily::CharacteristicBased),
            SystemData::AttributeBased(_) => Some(GameFamily::AttributeBased),
            SystemData::Unrecognized => None,
        }
    }
}

// --- characteristic based ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacteristicSystem {
    #[serde(default, deserialize_with = "de::lenient")]
    pub characteristics: Option<Entries<Characteristic>>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub status: Option<CharacteristicStatus>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub details: Option<CharacteristicDetails>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub skills: Option<Entries<CharacteristicSkill>>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub talents: Option<Entries<Talent>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Characteristic {
    #[serde(default, deserialize_with = "de::number")]
    pub initial: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub advances: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
}

impl Characteristic {
    /// Current score: `value`, falling back to `initial`.
    pub fn score(&self) -> i64 {
        self.value.or(self.initial).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacteristicStatus {
    #[serde(default, deserialize_with = "de::lenient")]
    pub wounds: Option<Wounds>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub armour: Option<Armour>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wounds {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Armour {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub head: Option<i64>,
}

impl Armour {
    /// Armour points: the overall value, else the head location.
    pub fn points(&self) -> i64 {
        self.value.or(self.head).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacteristicDetails {
    #[serde(default, deserialize_with = "de::text")]
    pub species: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub career: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacteristicSkill {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub characteristic: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub advances: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub total: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Talent {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub advances: Option<i64>,
    #[serde(default, deserialize_with = "de::text")]
    pub description: Option<String>,
}

/// Display names for the ten standard characteristics.
const CHARACTERISTIC_NAMES: [(&str, &str); 10] = [
    ("ws", "Weapon Skill"),
    ("bs", "Ballistic Skill"),
    ("s", "Strength"),
    ("t", "Toughness"),
    ("i", "Initiative"),
    ("ag", "Agility"),
    ("dex", "Dexterity"),
    ("int", "Intelligence"),
    ("wp", "Willpower"),
    ("fel", "Fellowship"),
];

pub fn characteristic_name(key: &str) -> String {
    CHARACTERISTIC_NAMES
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, name)| (*name).to_owned())
        .unwrap_or_else(|| key.to_uppercase())
}

/// Tens digit of a percentile score.
pub fn bonus(score: i64) -> i64 {
    score.div_euclid(10)
}

// --- attribute based ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeSystem {
    #[serde(default, deserialize_with = "de::lenient")]
    pub attributes: Option<Attributes>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub details: Option<AttributeDetails>,
    /// Some systems keep the level at the top of `system`.
    #[serde(default, deserialize_with = "de::number_or_value")]
    pub level: Option<i64>,
    #[serde(default, rename = "class", deserialize_with = "de::text")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub abilities: Option<Entries<Ability>>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub skills: Option<Entries<AttributeSkill>>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub saves: Option<Entries<Save>>,
}

impl AttributeSystem {
    pub fn level(&self) -> Option<i64> {
        self.details.as_ref().and_then(|d| d.level).or(self.level)
    }

    pub fn class_name(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.class_name.as_deref())
            .or(self.class_name.as_deref())
    }

    pub fn race(&self) -> Option<&str> {
        let details = self.details.as_ref()?;
        details.race.as_deref().or(details.ancestry.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attributes {
    #[serde(default, deserialize_with = "de::lenient")]
    pub hp: Option<HitPoints>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub ac: Option<ArmorClass>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitPoints {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub max: Option<i64>,
    #[serde(default, deserialize_with = "de::number")]
    pub temp: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArmorClass {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeDetails {
    #[serde(default, deserialize_with = "de::number_or_value")]
    pub level: Option<i64>,
    #[serde(default, rename = "class", deserialize_with = "de::text")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub ancestry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ability {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, rename = "mod", deserialize_with = "de::number")]
    pub modifier: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeSkill {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub proficient: Option<bool>,
    #[serde(default, deserialize_with = "de::text")]
    pub ability: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Save {
    #[serde(default, deserialize_with = "de::number")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub proficient: Option<bool>,
}
