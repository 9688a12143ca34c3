//! Client-facing projections of actor records.

use serde::Serialize;

use super::actor::{ActorRecord, EffectRecord, ItemRecord};
use super::entries::Entries;
use super::family::{bonus, characteristic_name, AttributeSystem, CharacteristicSystem, SystemData};
use super::text::truncate;

pub const MAX_ITEMS: usize = 20;
pub const ITEM_DESCRIPTION_LEN: usize = 200;
pub const TALENT_DESCRIPTION_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub basic_info: BasicInfo,
    pub stats: Stats,
    pub items: Vec<ItemSummary>,
    pub effects: Vec<EffectSummary>,
    pub has_image: bool,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BasicInfo {
    Characteristic(CharacteristicInfo),
    Attribute(AttributeInfo),
    Unrecognized(Empty),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharacteristicInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wounds: Option<WoundsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<ToughnessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WoundsInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToughnessInfo {
    pub bonus: i64,
    pub armor_points: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<HitPointsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor_class: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitPointsInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    pub temp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stats {
    Characteristic(CharacteristicStats),
    Attribute(AttributeStats),
    Unrecognized(Empty),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharacteristicStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Entries<CharacteristicStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Entries<SkillStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talents: Option<Vec<TalentStat>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicStat {
    pub name: String,
    pub initial: i64,
    pub advances: i64,
    pub value: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
    pub advances: i64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalentStat {
    pub name: String,
    pub advances: i64,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Entries<AbilityStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Entries<ProficiencyStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves: Option<Entries<SaveStat>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityStat {
    pub score: i64,
    pub modifier: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProficiencyStat {
    pub value: i64,
    pub proficient: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveStat {
    pub value: i64,
    pub proficient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    pub description: String,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSummary {
    pub id: String,
    pub name: String,
    pub disabled: bool,
    pub duration: Option<DurationSummary>,
    pub has_icon: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSummary {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub remaining: Option<i64>,
}

/// Lightweight projection used when listing actors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterListing {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub has_image: bool,
}

impl From<&ActorRecord> for CharacterListing {
    fn from(r: &ActorRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            kind: r.kind.clone(),
            has_image: r.has_image(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterList {
    pub characters: Vec<CharacterListing>,
    pub total: usize,
    pub filtered: String,
}

impl CharacterList {
    pub fn new(records: &[ActorRecord], type_filter: Option<&str>) -> Self {
        let characters: Vec<CharacterListing> = records.iter().map(CharacterListing::from).collect();
        let filtered = match type_filter {
            Some(t) => format!("Filtered by type: {t}"),
            None => "All characters".to_owned(),
        };
        Self {
            total: characters.len(),
            characters,
            filtered,
        }
    }
}

/// Build the full summary. `system` is decoded once and shared by both
/// extraction steps.
pub fn summarize(record: &ActorRecord) -> CharacterSummary {
    let system = SystemData::decode(record);
    CharacterSummary {
        id: record.id.clone(),
        name: record.name.clone(),
        kind: record.kind.clone(),
        basic_info: extract_basic_info(&system),
        stats: extract_stats(&system),
        items: format_items(&record.items),
        effects: format_effects(&record.effects),
        has_image: record.has_image(),
    }
}

pub fn extract_basic_info(system: &SystemData) -> BasicInfo {
    match system {
        SystemData::CharacteristicBased(sys) => BasicInfo::Characteristic(characteristic_info(sys)),
        SystemData::AttributeBased(sys) => BasicInfo::Attribute(attribute_info(sys)),
        SystemData::Unrecognized => BasicInfo::Unrecognized(Empty {}),
    }
}

pub fn extract_stats(system: &SystemData) -> Stats {
    match system {
        SystemData::CharacteristicBased(sys) => Stats::Characteristic(characteristic_stats(sys)),
        SystemData::AttributeBased(sys) => Stats::Attribute(attribute_stats(sys)),
        SystemData::Unrecognized => Stats::Unrecognized(Empty {}),
    }
}

fn characteristic_info(sys: &CharacteristicSystem) -> CharacteristicInfo {
    let status = sys.status.as_ref();
    let wounds = status.and_then(|s| s.wounds.as_ref()).map(|w| WoundsInfo {
        current: w.value,
        max: w.max,
    });
    let toughness = sys
        .characteristics
        .as_ref()
        .and_then(|c| c.get("t"))
        .map(|t| {
            let bonus = bonus(t.score());
            let armor_points = status
                .and_then(|s| s.armour.as_ref())
                .map(|a| a.points())
                .unwrap_or(0);
            ToughnessInfo {
                bonus,
                armor_points,
                total: bonus.saturating_add(armor_points),
            }
        });
    let details = sys.details.as_ref();
    CharacteristicInfo {
        wounds,
        toughness,
        species: details.and_then(|d| d.species.clone()),
        career: details.and_then(|d| d.career.clone()),
        status: details.and_then(|d| d.status.clone()),
    }
}

fn attribute_info(sys: &AttributeSystem) -> AttributeInfo {
    let attributes = sys.attributes.as_ref();
    AttributeInfo {
        hit_points: attributes.and_then(|a| a.hp.as_ref()).map(|hp| HitPointsInfo {
            current: hp.value,
            max: hp.max,
            temp: hp.temp.unwrap_or(0),
        }),
        armor_class: attributes.and_then(|a| a.ac.as_ref()).and_then(|ac| ac.value),
        level: sys.level(),
        class_name: sys.class_name().map(str::to_owned),
        race: sys.race().map(str::to_owned),
    }
}

fn characteristic_stats(sys: &CharacteristicSystem) -> CharacteristicStats {
    let characteristics = sys.characteristics.as_ref().map(|entries| {
        entries
            .iter()
            .map(|(key, c)| {
                let value = c.score();
                let stat = CharacteristicStat {
                    name: characteristic_name(key),
                    initial: c.initial.unwrap_or(0),
                    advances: c.advances.unwrap_or(0),
                    value,
                    bonus: bonus(value),
                };
                (key.to_uppercase(), stat)
            })
            .collect()
    });
    let skills = sys.skills.as_ref().map(|entries| {
        entries
            .iter()
            .filter_map(|(_, s)| {
                let name = s.name.clone()?;
                let stat = SkillStat {
                    characteristic: s.characteristic.clone(),
                    advances: s.advances.unwrap_or(0),
                    value: s.total.or(s.value).unwrap_or(0),
                };
                Some((name, stat))
            })
            .collect()
    });
    let talents = sys.talents.as_ref().map(|entries| {
        entries
            .iter()
            .filter_map(|(_, t)| {
                Some(TalentStat {
                    name: t.name.clone()?,
                    advances: t.advances.unwrap_or(1),
                    description: truncate(t.description.as_deref().unwrap_or(""), TALENT_DESCRIPTION_LEN),
                })
            })
            .collect()
    });
    CharacteristicStats {
        characteristics,
        skills,
        talents,
    }
}

fn attribute_stats(sys: &AttributeSystem) -> AttributeStats {
    AttributeStats {
        abilities: sys.abilities.as_ref().map(|entries| {
            entries
                .iter()
                .map(|(key, a)| {
                    let stat = AbilityStat {
                        score: a.value.unwrap_or(10),
                        modifier: a.modifier.unwrap_or(0),
                    };
                    (key.to_owned(), stat)
                })
                .collect()
        }),
        skills: sys.skills.as_ref().map(|entries| {
            entries
                .iter()
                .map(|(key, s)| {
                    let stat = ProficiencyStat {
                        value: s.value.unwrap_or(0),
                        proficient: s.proficient.unwrap_or(false),
                        ability: s.ability.clone(),
                    };
                    (key.to_owned(), stat)
                })
                .collect()
        }),
        saves: sys.saves.as_ref().map(|entries| {
            entries
                .iter()
                .map(|(key, s)| {
                    let stat = SaveStat {
                        value: s.value.unwrap_or(0),
                        proficient: s.proficient.unwrap_or(false),
                    };
                    (key.to_owned(), stat)
                })
                .collect()
        }),
    }
}

/// First [`MAX_ITEMS`] items in input order; the rest are dropped.
pub fn format_items(items: &[ItemRecord]) -> Vec<ItemSummary> {
    items
        .iter()
        .take(MAX_ITEMS)
        .map(|item| {
            let system = item.system.as_ref();
            let description = system.and_then(|s| s.description.as_deref()).unwrap_or("");
            ItemSummary {
                id: item.id.clone(),
                name: item.name.clone(),
                kind: item.kind.clone(),
                quantity: system.and_then(|s| s.quantity).unwrap_or(1),
                description: truncate(description, ITEM_DESCRIPTION_LEN),
                has_image: item.img.is_some(),
            }
        })
        .collect()
}

pub fn format_effects(effects: &[EffectRecord]) -> Vec<EffectSummary> {
    effects
        .iter()
        .map(|effect| EffectSummary {
            id: effect.id.clone(),
            name: effect
                .name
                .clone()
                .or_else(|| effect.label.clone())
                .unwrap_or_default(),
            disabled: effect.disabled.unwrap_or(false),
            duration: effect.duration.as_ref().map(|d| DurationSummary {
                kind: d.kind.clone(),
                remaining: d.remaining,
            }),
            has_icon: effect.icon.is_some() || effect.img.is_some(),
        })
        .collect()
}
