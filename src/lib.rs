//! A world graph for text adventures: rooms linked by identifier, entities and
//! items with single ownership, and a lock/key protocol gating rooms.
//!
//! Worlds are read from TOML story files and assembled in two passes, see
//! [`world::build_world`].

pub mod engine;
pub mod errors;
pub mod world;

pub use engine::{
    Holder, UnlockOutcome, drop_item, move_entity, move_item, pick_up, try_unlock, unlock_with,
};
pub use errors::{RecordKind, TransferError, WorldError};
pub use world::{
    BuildOptions, DuplicatePolicy, Entity, EntityId, Item, ItemKind, LockState, Room, RoomId,
    World, build_world, destroy_world, init_world, init_world_from_str, validate_world,
};
