use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::model::{Entity, EntityId, Item, Mission, Room, RoomId, World};
use super::source::{
    EntityRecord, ItemRecord, MissionRecord, RoomRecord, StorySource, normalize_description,
    parse_story, read_story,
};
use crate::errors::{RecordKind, WorldError};

/// What to do when two rooms (or two items) share an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the load with `DuplicateRoomId` / `DuplicateItemId`.
    #[default]
    Reject,
    /// Keep loading; lookups by identifier bind to the first room loaded.
    FirstMatch,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub duplicates: DuplicatePolicy,
}

/// What `destroy_world` released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Teardown {
    pub rooms: usize,
    pub entities: usize,
    pub items: usize,
    pub edges: usize,
}

/// Load a story file and build its world graph.
pub fn init_world(path: &Path) -> Result<World, WorldError> {
    let source = read_story(path)?;
    info!("loaded story file {}", path.display());
    build_world(source)
}

pub fn init_world_from_str(text: &str) -> Result<World, WorldError> {
    build_world(parse_story(text)?)
}

pub fn build_world(source: StorySource) -> Result<World, WorldError> {
    build_world_with(source, &BuildOptions::default())
}

/// Build a world in two passes: every room and entity is created first, and
/// only then are neighbour identifiers resolved, so a connection may name a
/// room that appears later in the story.
pub fn build_world_with(source: StorySource, options: &BuildOptions) -> Result<World, WorldError> {
    let mut world = World::new(source.world.title);
    let mut builder = Builder::new(options);

    for record in source.rooms {
        builder.load_room(&mut world, record)?;
    }

    connect_rooms(&mut world, builder.connections);

    for (index, record) in source.missions.into_iter().enumerate() {
        let mission = resolve_mission(&world, record, index)?;
        world.missions.push(mission);
    }

    info!(
        "built world '{}': {} rooms, {} entities, {} missions",
        world.title,
        world.rooms.len(),
        world.population.len(),
        world.missions.len()
    );
    Ok(world)
}

/// Tear the world down: every neighbour and occupant edge is cleared before
/// the registries are released.
pub fn destroy_world(mut world: World) -> Teardown {
    let mut report = Teardown::default();

    for room in &mut world.rooms {
        report.edges += room.clear_edges();
    }
    for room in &mut world.rooms {
        report.items += room.inventory_mut().drain().count();
    }
    for entity in &mut world.population {
        report.items += entity.inventory_mut().drain().count();
    }

    report.rooms = world.rooms.len();
    report.entities = world.population.len();
    world.rooms.clear();
    world.population.clear();
    world.missions.clear();

    debug!(
        "world torn down: {} rooms, {} entities, {} items, {} edges",
        report.rooms, report.entities, report.items, report.edges
    );
    report
}

///////////////////////
/// PASS 1: RECORDS ///
///////////////////////

struct Builder<'a> {
    options: &'a BuildOptions,
    /// Room identifier -> neighbour identifiers, only alive during the build.
    connections: BTreeMap<i64, Vec<i64>>,
    room_ids: HashSet<i64>,
    item_ids: HashSet<i64>,
    rooms_seen: usize,
    entities_seen: usize,
    items_seen: usize,
}

impl<'a> Builder<'a> {
    fn new(options: &'a BuildOptions) -> Self {
        Builder {
            options,
            connections: BTreeMap::new(),
            room_ids: HashSet::new(),
            item_ids: HashSet::new(),
            rooms_seen: 0,
            entities_seen: 0,
            items_seen: 0,
        }
    }

    fn load_room(&mut self, world: &mut World, record: RoomRecord) -> Result<RoomId, WorldError> {
        let index = self.rooms_seen;
        self.rooms_seen += 1;

        let name = required(record.name, RecordKind::Room, index, "name")?;
        let number = required(record.id, RecordKind::Room, index, "id")?;
        let description = required(record.description, RecordKind::Room, index, "description")?;

        if !self.room_ids.insert(number) {
            match self.options.duplicates {
                DuplicatePolicy::Reject => return Err(WorldError::DuplicateRoomId(number)),
                DuplicatePolicy::FirstMatch => {
                    warn!("room id {number} declared twice; lookups bind to the first room")
                }
            }
        }

        let mut room = Room::new(name, number, normalize_description(&description));
        room.add_items(self.make_items(record.inventory)?);
        let handle = world.push_room(room);

        // A repeated identifier keeps the first room's connection list.
        self.connections.entry(number).or_insert(record.connections);

        // Only the entities created for this record become its occupants,
        // never anything already in the population.
        let first_new = world.population.len();
        for entity in record.entities {
            let entity = self.make_entity(entity)?;
            world.push_entity(entity);
        }
        let added: Vec<EntityId> = (first_new..world.population.len())
            .map(|i| world.entity_handle(i))
            .collect();

        let room = &mut world.rooms[handle.index];
        debug!(
            "room {} '{}' loaded with {} items and {} occupants",
            number,
            room.name(),
            room.inventory().len(),
            added.len()
        );
        room.add_entities(added);

        Ok(handle)
    }

    fn make_entity(&mut self, record: EntityRecord) -> Result<Entity, WorldError> {
        let index = self.entities_seen;
        self.entities_seen += 1;

        let name = required(record.name, RecordKind::Entity, index, "name")?;
        let mut entity = Entity::new(name).with_stats(record.stats);
        entity.add_items(self.make_items(record.inventory)?);
        Ok(entity)
    }

    fn make_items(&mut self, records: Vec<ItemRecord>) -> Result<Vec<Item>, WorldError> {
        records.into_iter().map(|r| self.make_item(r)).collect()
    }

    fn make_item(&mut self, record: ItemRecord) -> Result<Item, WorldError> {
        let index = self.items_seen;
        self.items_seen += 1;

        let name = required(record.name, RecordKind::Item, index, "name")?;
        let number = required(record.id, RecordKind::Item, index, "id")?;
        let description = required(record.description, RecordKind::Item, index, "description")?;

        if !self.item_ids.insert(number) {
            match self.options.duplicates {
                DuplicatePolicy::Reject => return Err(WorldError::DuplicateItemId(number)),
                DuplicatePolicy::FirstMatch => warn!("item id {number} declared twice"),
            }
        }

        let description = normalize_description(&description);
        Ok(match record.opens {
            Some(opens) => Item::key(opens, name, number, description),
            None => Item::object(name, number, description),
        })
    }
}

fn required<T>(
    value: Option<T>,
    kind: RecordKind,
    index: usize,
    field: &'static str,
) -> Result<T, WorldError> {
    value.ok_or(WorldError::MalformedRecord { kind, index, field })
}

////////////////////////////
/// PASS 2: CONNECTIONS  ///
////////////////////////////

/// Resolve neighbour identifiers into room handles. Unknown identifiers are
/// skipped: a missing parent drops its whole entry, a missing neighbour drops
/// only that edge.
fn connect_rooms(world: &mut World, connections: BTreeMap<i64, Vec<i64>>) {
    for (parent_id, neighbour_ids) in connections {
        let Some(parent) = world.find_room(parent_id) else {
            debug!("connection entry for unknown room {parent_id} skipped");
            continue;
        };

        for neighbour_id in neighbour_ids {
            match world.find_room(neighbour_id) {
                Some(neighbour) => {
                    world.rooms[parent.index].add_neighbour(neighbour);
                }
                None => debug!("room {parent_id}: connection to unknown room {neighbour_id} skipped"),
            }
        }
    }
}

/// A mission needs a description and at least one target. An unknown target
/// room is dropped here; whether the target item exists is the validator's
/// call, since items move after the build.
fn resolve_mission(
    world: &World,
    record: MissionRecord,
    index: usize,
) -> Result<Mission, WorldError> {
    let description = required(record.description, RecordKind::Mission, index, "description")?;
    if record.target_room.is_none() && record.target_item.is_none() {
        return Err(WorldError::MalformedRecord {
            kind: RecordKind::Mission,
            index,
            field: "target_room or target_item",
        });
    }

    let target_room = record.target_room.and_then(|number| {
        let found = world.find_room(number);
        if found.is_none() {
            debug!("mission target room {number} not found");
        }
        found
    });
    Ok(Mission::new(
        normalize_description(&description),
        target_room,
        record.target_item,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_index_counts_records_of_the_same_kind() {
        let source = StorySource {
            rooms: vec![
                RoomRecord::new("Hall", 1, "").with_item(ItemRecord::object("Rock", 10, "")),
                RoomRecord::new("Yard", 2, "").with_item(ItemRecord {
                    name: Some("Stick".to_string()),
                    id: Some(11),
                    description: None,
                    opens: None,
                }),
            ],
            ..StorySource::default()
        };

        match build_world(source) {
            Err(WorldError::MalformedRecord { kind, index, field }) => {
                assert_eq!(kind, RecordKind::Item);
                assert_eq!(index, 1);
                assert_eq!(field, "description");
            }
            other => panic!("expected malformed item, got {other:?}"),
        }
    }

    #[test]
    fn first_match_keeps_the_first_connection_list() {
        let source = StorySource {
            rooms: vec![
                RoomRecord::new("Hall", 1, "").connect(&[2]),
                RoomRecord::new("Vault", 2, ""),
                RoomRecord::new("Shadow hall", 1, "").connect(&[1]),
            ],
            ..StorySource::default()
        };
        let options = BuildOptions {
            duplicates: DuplicatePolicy::FirstMatch,
        };

        let world = build_world_with(source, &options).expect("first-match build");
        assert_eq!(world.rooms[0].neighbours(), &[world.room_handle(1)]);
        assert!(world.rooms[2].neighbours().is_empty());
        assert_eq!(world.find_room(1), Some(world.room_handle(0)));
    }

    #[test]
    fn missions_resolve_their_room_after_connections() {
        let source = StorySource {
            rooms: vec![RoomRecord::new("Hall", 1, ""), RoomRecord::new("Vault", 2, "")],
            missions: vec![
                MissionRecord {
                    description: Some("Reach the vault".to_string()),
                    target_room: Some(2),
                    target_item: None,
                },
                MissionRecord {
                    description: Some("Find the lost wing".to_string()),
                    target_room: Some(42),
                    target_item: Some(7),
                },
            ],
            ..StorySource::default()
        };

        let world = build_world(source).expect("build");
        assert_eq!(world.missions[0].target_room, world.find_room(2));
        assert_eq!(world.missions[1].target_room, None);
        assert_eq!(world.missions[1].target_item, Some(7));
    }

    #[test]
    fn first_match_tolerates_a_repeated_item_id() {
        let source = StorySource {
            rooms: vec![
                RoomRecord::new("Hall", 1, "").with_item(ItemRecord::object("Rock", 5, "")),
                RoomRecord::new("Yard", 2, "").with_entity(
                    EntityRecord::new("Guard").with_item(ItemRecord::object("Pebble", 5, "")),
                ),
            ],
            ..StorySource::default()
        };
        let options = BuildOptions {
            duplicates: DuplicatePolicy::FirstMatch,
        };

        let world = build_world_with(source, &options).expect("first-match build");
        assert!(world.rooms[0].inventory().contains(5));
        assert_eq!(world.population[0].inventory().get(5).map(|i| i.name()), Some("Pebble"));
    }

    #[test]
    fn mission_without_description_is_malformed() {
        let err = build_world(StorySource {
            rooms: vec![RoomRecord::new("Hall", 1, "")],
            missions: vec![MissionRecord {
                description: None,
                target_room: Some(1),
                target_item: None,
            }],
            ..StorySource::default()
        })
        .unwrap_err();

        assert!(matches!(
            err,
            WorldError::MalformedRecord {
                kind: RecordKind::Mission,
                index: 0,
                field: "description"
            }
        ));
    }

    #[test]
    fn mission_without_any_target_is_malformed() {
        let err = build_world(StorySource {
            rooms: vec![RoomRecord::new("Hall", 1, "")],
            missions: vec![MissionRecord {
                description: Some("Find it".to_string()),
                target_room: None,
                target_item: None,
            }],
            ..StorySource::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            WorldError::MalformedRecord {
                kind: RecordKind::Mission,
                index: 0,
                field: "target_room or target_item"
            }
        ));
    }
}
