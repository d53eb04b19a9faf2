use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::model::Stats;
use crate::errors::WorldError;

/////////////////////
/// STORY RECORDS ///
/////////////////////

// Required fields are `Option`s on purpose: the builder, not serde, decides
// what a malformed record is, so records built in code get the same checks
// as records read from a file.

/// A whole story file, already parsed into flat records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorySource {
    #[serde(default)]
    pub world: StoryHeader,
    #[serde(default, rename = "room")]
    pub rooms: Vec<RoomRecord>, // [[room]] blocks
    #[serde(default, rename = "mission")]
    pub missions: Vec<MissionRecord>, // [[mission]] blocks
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryHeader {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomRecord {
    pub name: Option<String>,
    pub id: Option<i64>,
    pub description: Option<String>,

    #[serde(default, rename = "object")]
    pub inventory: Vec<ItemRecord>, // [[room.object]]

    /// Identifiers of the rooms reachable from this one.
    #[serde(default)]
    pub connections: Vec<i64>,

    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityRecord>, // [[room.entity]]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    pub name: Option<String>,

    #[serde(default)]
    pub stats: Stats,

    #[serde(default, rename = "object")]
    pub inventory: Vec<ItemRecord>, // [[room.entity.object]]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRecord {
    pub name: Option<String>,
    pub id: Option<i64>,
    pub description: Option<String>,

    /// Present only on keys: the identifier of the room this key opens.
    #[serde(default)]
    pub opens: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissionRecord {
    pub description: Option<String>,
    #[serde(default)]
    pub target_room: Option<i64>,
    #[serde(default)]
    pub target_item: Option<i64>,
}

impl RoomRecord {
    pub fn new(name: &str, id: i64, description: &str) -> Self {
        RoomRecord {
            name: Some(name.to_string()),
            id: Some(id),
            description: Some(description.to_string()),
            ..Self::default()
        }
    }

    pub fn connect(mut self, ids: &[i64]) -> Self {
        self.connections.extend_from_slice(ids);
        self
    }

    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_entity(mut self, entity: EntityRecord) -> Self {
        self.entities.push(entity);
        self
    }
}

impl EntityRecord {
    pub fn new(name: &str) -> Self {
        EntityRecord {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.inventory.push(item);
        self
    }
}

impl ItemRecord {
    pub fn object(name: &str, id: i64, description: &str) -> Self {
        ItemRecord {
            name: Some(name.to_string()),
            id: Some(id),
            description: Some(description.to_string()),
            opens: None,
        }
    }

    pub fn key(opens: i64, name: &str, id: i64, description: &str) -> Self {
        ItemRecord {
            opens: Some(opens),
            ..Self::object(name, id, description)
        }
    }
}

////////////////////
/// STORY READER ///
////////////////////

pub fn parse_story(text: &str) -> Result<StorySource, WorldError> {
    Ok(toml::from_str(text)?)
}

pub fn read_story(path: &Path) -> Result<StorySource, WorldError> {
    let contents = fs::read_to_string(path)?;
    parse_story(&contents)
}

/// Tidy a description written as a multi-line TOML string: indentation is
/// dropped, wrapped lines are joined with a space, one blank line becomes a
/// line break and two or more become a paragraph break.
pub(crate) fn normalize_description(raw: &str) -> String {
    let mut out = String::new();
    let mut blanks = 0usize;

    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(match blanks {
                0 => " ",
                1 => "\n",
                _ => "\n\n",
            });
        }
        out.push_str(line);
        blanks = 0;
    }

    out
}
