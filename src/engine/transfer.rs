use log::debug;

use crate::errors::TransferError;
use crate::world::{EntityId, Inventory, RoomId, World};

/// Anything that owns an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    Room(RoomId),
    Entity(EntityId),
}

fn inventory_mut(world: &mut World, holder: Holder) -> Result<&mut Inventory, TransferError> {
    match holder {
        Holder::Room(id) => world
            .room_mut(id)
            .map(|r| r.inventory_mut())
            .ok_or(TransferError::UnknownRoom(id)),
        Holder::Entity(id) => world
            .entity_mut(id)
            .map(|e| e.inventory_mut())
            .ok_or(TransferError::UnknownEntity(id)),
    }
}

/// Move item `item_id` from one holder to another. Both holders are checked
/// before anything moves, so on error the world is unchanged.
pub fn move_item(
    world: &mut World,
    from: Holder,
    to: Holder,
    item_id: i64,
) -> Result<(), TransferError> {
    inventory_mut(world, to)?;

    let item = inventory_mut(world, from)?
        .take(item_id)
        .ok_or(TransferError::ItemNotHeld {
            holder: from,
            item: item_id,
        })?;

    debug!("item {} '{}' moved {:?} -> {:?}", item.id(), item.name(), from, to);
    inventory_mut(world, to)?.add(item);
    Ok(())
}

pub fn pick_up(
    world: &mut World,
    entity: EntityId,
    room: RoomId,
    item_id: i64,
) -> Result<(), TransferError> {
    move_item(world, Holder::Room(room), Holder::Entity(entity), item_id)
}

pub fn drop_item(
    world: &mut World,
    entity: EntityId,
    room: RoomId,
    item_id: i64,
) -> Result<(), TransferError> {
    move_item(world, Holder::Entity(entity), Holder::Room(room), item_id)
}

/// Move an occupant from one room to another.
pub fn move_entity(
    world: &mut World,
    entity: EntityId,
    from: RoomId,
    to: RoomId,
) -> Result<(), TransferError> {
    if world.entity(entity).is_none() {
        return Err(TransferError::UnknownEntity(entity));
    }
    if world.room(to).is_none() {
        return Err(TransferError::UnknownRoom(to));
    }

    let source = world.room_mut(from).ok_or(TransferError::UnknownRoom(from))?;
    if !source.remove_entity(entity) {
        return Err(TransferError::EntityNotPresent { entity, room: from });
    }

    world
        .room_mut(to)
        .ok_or(TransferError::UnknownRoom(to))?
        .add_entity(entity);
    debug!("entity #{} moved {:?} -> {:?}", entity.index(), from, to);
    Ok(())
}
