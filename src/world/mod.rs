mod builder;
mod model;
mod source;
mod validator;

pub use builder::{
    BuildOptions, DuplicatePolicy, Teardown, build_world, build_world_with, destroy_world,
    init_world, init_world_from_str,
};

pub use model::{
    Entity, EntityId, Inventory, Item, ItemKind, LockState, Mission, MissionStatus, Room, RoomId,
    Stats, World,
};
pub use source::{
    EntityRecord, ItemRecord, MissionRecord, RoomRecord, StoryHeader, StorySource, parse_story,
    read_story,
};
pub use validator::{ValidationError, validate_world};
