use log::debug;

use crate::engine::transfer::Holder;
use crate::errors::TransferError;
use crate::world::{EntityId, Item, Room, RoomId, World};

/// Result of presenting an item to a room's lock.
#[derive(Debug, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// The key matched; the room is now unlocked and the key is gone.
    Unlocked,
    /// The item does not open this room. It comes back untouched.
    Rejected(Item),
    /// The room was already open. Nothing is consumed.
    AlreadyUnlocked(Item),
}

impl UnlockOutcome {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, UnlockOutcome::Unlocked)
    }

    /// The candidate item, if it was handed back.
    pub fn into_item(self) -> Option<Item> {
        match self {
            UnlockOutcome::Unlocked => None,
            UnlockOutcome::Rejected(item) | UnlockOutcome::AlreadyUnlocked(item) => Some(item),
        }
    }
}

/// Try to open `room` with `candidate`. Only a key whose target equals the
/// room's identifier works, and only on a locked room; a successful key is
/// consumed.
pub fn try_unlock(candidate: Item, room: &mut Room) -> UnlockOutcome {
    if !room.is_locked() {
        return UnlockOutcome::AlreadyUnlocked(candidate);
    }

    if candidate.opens() != Some(room.id()) {
        return UnlockOutcome::Rejected(candidate);
    }

    debug!(
        "'{}' (item {}) unlocked room {} '{}'",
        candidate.name(),
        candidate.id(),
        room.id(),
        room.name()
    );
    room.set_unlocked();
    UnlockOutcome::Unlocked
}

/// Have `entity` try the item `item_id` from its own inventory on `room`.
/// A rejected item goes straight back into the entity's inventory. Returns
/// whether the room was unlocked by this call.
pub fn unlock_with(
    world: &mut World,
    entity: EntityId,
    item_id: i64,
    room: RoomId,
) -> Result<bool, TransferError> {
    if world.room(room).is_none() {
        return Err(TransferError::UnknownRoom(room));
    }

    let candidate = world
        .entity_mut(entity)
        .ok_or(TransferError::UnknownEntity(entity))?
        .inventory_mut()
        .take(item_id)
        .ok_or(TransferError::ItemNotHeld {
            holder: Holder::Entity(entity),
            item: item_id,
        })?;

    let target = world
        .room_mut(room)
        .ok_or(TransferError::UnknownRoom(room))?;
    let outcome = try_unlock(candidate, target);
    let unlocked = outcome.is_unlocked();

    if let Some(item) = outcome.into_item() {
        world
            .entity_mut(entity)
            .ok_or(TransferError::UnknownEntity(entity))?
            .add_item(item);
    }

    Ok(unlocked)
}
