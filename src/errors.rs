use std::fmt;

use thiserror::Error;

use crate::engine::Holder;
use crate::world::{EntityId, RoomId};

/// Which kind of story record a construction error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Room,
    Entity,
    Item,
    Mission,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Room => "room",
            RecordKind::Entity => "entity",
            RecordKind::Item => "item",
            RecordKind::Mission => "mission",
        };
        f.write_str(label)
    }
}

/// Errors that abort world construction. No partial world is ever returned
/// alongside one of these.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The story file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The story text is not valid TOML or does not have the record shape.
    #[error("story parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required field is missing. `index` counts records of the same kind
    /// in load order, starting at 0.
    #[error("malformed {kind} record #{index}: missing `{field}`")]
    MalformedRecord {
        kind: RecordKind,
        index: usize,
        field: &'static str,
    },

    /// Two rooms declare the same numeric identifier.
    #[error("duplicate room id: {0}")]
    DuplicateRoomId(i64),

    /// Two items declare the same numeric identifier.
    #[error("duplicate item id: {0}")]
    DuplicateItemId(i64),
}

/// Errors from moving items or entities around a built world. A failed
/// transfer leaves every container untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("no room with handle {0:?}")]
    UnknownRoom(RoomId),

    #[error("no entity with handle {0:?}")]
    UnknownEntity(EntityId),

    #[error("item {item} is not held by {holder:?}")]
    ItemNotHeld { holder: Holder, item: i64 },

    #[error("entity {entity:?} is not in room {room:?}")]
    EntityNotPresent { entity: EntityId, room: RoomId },
}
