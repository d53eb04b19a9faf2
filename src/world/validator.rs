use std::collections::HashSet;

use super::model::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Check the post-construction invariants of a world graph. A world built by
/// `build_world` with the default options always comes back clean.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    let mut room_numbers: HashSet<i64> = HashSet::new();
    for room in world.rooms() {
        if !room_numbers.insert(room.id()) {
            errors.push(ValidationError::new(format!(
                "room id {} is used by more than one room",
                room.id()
            )));
        }
    }

    // Every edge must land inside the registries
    for room in world.rooms() {
        for neighbour in room.neighbours() {
            if world.room(*neighbour).is_none() {
                errors.push(ValidationError::new(format!(
                    "room {} '{}' has a dangling neighbour #{}",
                    room.id(),
                    room.name(),
                    neighbour.index()
                )));
            }
        }
        for occupant in room.occupants() {
            if world.entity(*occupant).is_none() {
                errors.push(ValidationError::new(format!(
                    "room {} '{}' has a dangling occupant #{}",
                    room.id(),
                    room.name(),
                    occupant.index()
                )));
            }
        }
    }

    // Item identifiers are unique across every container
    let mut item_numbers: HashSet<i64> = HashSet::new();
    let room_items = world.rooms().iter().flat_map(|r| r.inventory().iter());
    let entity_items = world.population().iter().flat_map(|e| e.inventory().iter());
    for item in room_items.chain(entity_items) {
        if !item_numbers.insert(item.id()) {
            errors.push(ValidationError::new(format!(
                "item id {} ('{}') is held more than once",
                item.id(),
                item.name()
            )));
        }
    }

    for (index, mission) in world.missions().iter().enumerate() {
        if let Some(target) = mission.target_room {
            if world.room(target).is_none() {
                errors.push(ValidationError::new(format!(
                    "mission #{} targets a missing room #{}",
                    index,
                    target.index()
                )));
            }
        }
        if let Some(item) = mission.target_item {
            if !world.holds_item(item) {
                errors.push(ValidationError::new(format!(
                    "mission #{} targets item {} that nothing holds",
                    index, item
                )));
            }
        }
    }

    errors
}
