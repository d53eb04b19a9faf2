use serde::Deserialize;
use std::sync::atomic::{AtomicU32, Ordering};

//////////////////////
/// ARENA HANDLES  ///
//////////////////////

static NEXT_WORLD_TAG: AtomicU32 = AtomicU32::new(1);

/// Handle to a room in `World::rooms()`. Neighbour edges are stored as these
/// handles, so a room never owns another room. A handle carries the tag of
/// the world that issued it and resolves to nothing in any other world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId {
    pub(crate) world: u32,
    pub(crate) index: usize,
}

impl RoomId {
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to an entity in `World::population()`, tagged like `RoomId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub(crate) world: u32,
    pub(crate) index: usize,
}

impl EntityId {
    pub fn index(self) -> usize {
        self.index
    }
}

/////////////
/// ITEMS ///
/////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Object,
    /// Opens the room whose identifier equals `opens`.
    Key { opens: i64 },
}

/// A thing that can be carried. Items are deliberately not `Clone`: handing
/// one to a container moves it, so no two containers can ever hold the same
/// item.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    name: String,
    id: i64,
    description: String,
    kind: ItemKind,
}

impl Item {
    pub fn object(name: impl Into<String>, id: i64, description: impl Into<String>) -> Self {
        Item {
            name: name.into(),
            id,
            description: description.into(),
            kind: ItemKind::Object,
        }
    }

    pub fn key(
        opens: i64,
        name: impl Into<String>,
        id: i64,
        description: impl Into<String>,
    ) -> Self {
        Item {
            name: name.into(),
            id,
            description: description.into(),
            kind: ItemKind::Key { opens },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The room identifier this item opens, if it is a key.
    pub fn opens(&self) -> Option<i64> {
        match self.kind {
            ItemKind::Key { opens } => Some(opens),
            ItemKind::Object => None,
        }
    }
}

/// Exclusively-owned items of one room or one entity, in insertion order.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// Remove the first item with identifier `id` and hand ownership back.
    pub fn take(&mut self, id: i64) -> Option<Item> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Item> + '_ {
        self.items.drain(..)
    }
}

////////////////
/// ENTITIES ///
////////////////

/// Attributes of an actor. The graph logic never reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub health: i32,
    pub stamina: i32,
    pub intelligence: i32,
    pub agility: i32,
    pub strength: i32,
    pub stealth: i32,
    pub charisma: i32,
}

/// A player or NPC. The population registry owns it; rooms refer to it by
/// `EntityId`.
#[derive(Debug)]
pub struct Entity {
    name: String,
    inventory: Inventory,
    stats: Stats,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Entity {
            name: name.into(),
            inventory: Inventory::new(),
            stats: Stats::default(),
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn add_item(&mut self, item: Item) -> &mut Self {
        self.inventory.add(item);
        self
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) -> &mut Self {
        self.inventory.add_all(items);
        self
    }
}

/////////////
/// ROOMS ///
/////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Locked,
    Unlocked,
}

#[derive(Debug)]
pub struct Room {
    name: String,
    id: i64,
    description: String,
    lock: LockState,
    inventory: Inventory,
    occupants: Vec<EntityId>,
    neighbours: Vec<RoomId>,
}

impl Room {
    /// Rooms start locked.
    pub fn new(name: impl Into<String>, id: i64, description: impl Into<String>) -> Self {
        Room {
            name: name.into(),
            id,
            description: description.into(),
            lock: LockState::Locked,
            inventory: Inventory::new(),
            occupants: Vec::new(),
            neighbours: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier used both for connections and for key matching.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn is_locked(&self) -> bool {
        self.lock == LockState::Locked
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn occupants(&self) -> &[EntityId] {
        &self.occupants
    }

    pub fn neighbours(&self) -> &[RoomId] {
        &self.neighbours
    }

    pub fn add_item(&mut self, item: Item) -> &mut Self {
        self.inventory.add(item);
        self
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) -> &mut Self {
        self.inventory.add_all(items);
        self
    }

    pub fn add_entity(&mut self, entity: EntityId) -> &mut Self {
        self.occupants.push(entity);
        self
    }

    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = EntityId>) -> &mut Self {
        self.occupants.extend(entities);
        self
    }

    pub fn add_neighbour(&mut self, room: RoomId) -> &mut Self {
        self.neighbours.push(room);
        self
    }

    pub fn add_neighbours(&mut self, rooms: impl IntoIterator<Item = RoomId>) -> &mut Self {
        self.neighbours.extend(rooms);
        self
    }

    pub fn has_occupant(&self, entity: EntityId) -> bool {
        self.occupants.contains(&entity)
    }

    // Locked -> Unlocked is the only transition; the key resolver is its only caller.
    pub(crate) fn set_unlocked(&mut self) {
        self.lock = LockState::Unlocked;
    }

    pub(crate) fn remove_entity(&mut self, entity: EntityId) -> bool {
        match self.occupants.iter().position(|e| *e == entity) {
            Some(pos) => {
                self.occupants.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every neighbour and occupant edge, returning how many there were.
    pub(crate) fn clear_edges(&mut self) -> usize {
        let count = self.neighbours.len() + self.occupants.len();
        self.neighbours.clear();
        self.occupants.clear();
        count
    }
}

////////////////
/// MISSIONS ///
////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissionStatus {
    #[default]
    InProgress,
    Finished,
}

#[derive(Debug)]
pub struct Mission {
    pub description: String,
    pub target_room: Option<RoomId>,
    pub target_item: Option<i64>,
    status: MissionStatus,
}

impl Mission {
    pub fn new(
        description: impl Into<String>,
        target_room: Option<RoomId>,
        target_item: Option<i64>,
    ) -> Self {
        Mission {
            description: description.into(),
            target_room,
            target_item,
            status: MissionStatus::InProgress,
        }
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    pub fn complete(&mut self) {
        self.status = MissionStatus::Finished;
    }
}

/////////////
/// WORLD ///
/////////////

/// The assembled world graph. Rooms and entities live in flat arenas kept in
/// load order; every edge between them is an index into those arenas.
#[derive(Debug)]
pub struct World {
    tag: u32,
    pub(crate) title: String,
    pub(crate) rooms: Vec<Room>,
    pub(crate) population: Vec<Entity>,
    pub(crate) missions: Vec<Mission>,
}

impl Default for World {
    fn default() -> Self {
        World::new("")
    }
}

impl World {
    pub fn new(title: impl Into<String>) -> Self {
        World {
            tag: NEXT_WORLD_TAG.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
            rooms: Vec::new(),
            population: Vec::new(),
            missions: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn population(&self) -> &[Entity] {
        &self.population
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn missions_mut(&mut self) -> &mut [Mission] {
        &mut self.missions
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        if id.world != self.tag {
            return None;
        }
        self.rooms.get(id.index)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        if id.world != self.tag {
            return None;
        }
        self.rooms.get_mut(id.index)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        if id.world != self.tag {
            return None;
        }
        self.population.get(id.index)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id.world != self.tag {
            return None;
        }
        self.population.get_mut(id.index)
    }

    pub fn room_ids(&self) -> impl Iterator<Item = RoomId> {
        (0..self.rooms.len()).map(|i| self.room_handle(i))
    }

    /// First room (in load order) carrying identifier `number`.
    pub fn find_room(&self, number: i64) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|r| r.id == number)
            .map(|i| self.room_handle(i))
    }

    pub fn find_room_by_name(&self, name: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(name))
            .map(|i| self.room_handle(i))
    }

    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.population
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
            .map(|i| self.entity_handle(i))
    }

    /// Rooms reachable in one step from `room`, in connection order.
    pub fn neighbours_of(&self, room: RoomId) -> impl Iterator<Item = &Room> {
        self.room(room)
            .map(|r| r.neighbours.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|n| self.room(*n))
    }

    pub fn occupants_of(&self, room: RoomId) -> impl Iterator<Item = &Entity> {
        self.room(room)
            .map(|r| r.occupants.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|e| self.entity(*e))
    }

    /// Every room whose occupant list contains `entity`.
    pub fn rooms_containing(&self, entity: EntityId) -> Vec<RoomId> {
        self.room_ids()
            .filter(|id| self.rooms[id.index].has_occupant(entity))
            .collect()
    }

    /// Whether any room or entity currently holds item `id`.
    pub fn holds_item(&self, id: i64) -> bool {
        self.rooms.iter().any(|r| r.inventory.contains(id))
            || self.population.iter().any(|e| e.inventory.contains(id))
    }

    pub(crate) fn room_handle(&self, index: usize) -> RoomId {
        RoomId {
            world: self.tag,
            index,
        }
    }

    pub(crate) fn entity_handle(&self, index: usize) -> EntityId {
        EntityId {
            world: self.tag,
            index,
        }
    }

    pub(crate) fn push_room(&mut self, room: Room) -> RoomId {
        self.rooms.push(room);
        self.room_handle(self.rooms.len() - 1)
    }

    pub(crate) fn push_entity(&mut self, entity: Entity) -> EntityId {
        self.population.push(entity);
        self.entity_handle(self.population.len() - 1)
    }
}
