//! Instance data documents.

use serde::Deserialize;

/// Raw instance data as written in YAML.
///
/// Records are inserted in document order: things first, then relations,
/// then ownerships. Relations may only reference things or relations that
/// appear before them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataDocument {
    #[serde(default)]
    pub things: Vec<ThingRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
    #[serde(default)]
    pub ownerships: Vec<OwnershipRecord>,
}

/// Entity or attribute instance.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThingRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(default)]
    pub value: Option<serde_yaml::Value>,
}

/// Relation instance and its role players.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRecord {
    pub role: String,
    pub player: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnershipRecord {
    pub owner: String,
    pub attribute: String,
}
