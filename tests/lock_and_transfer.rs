//! Unlocking rooms and moving things between containers on a built world.

use storyworld::world::{EntityRecord, ItemRecord, RoomRecord, StorySource};
use storyworld::{
    Holder, Item, LockState, TransferError, UnlockOutcome, World, build_world, drop_item,
    move_entity, move_item, pick_up, try_unlock, unlock_with,
};

fn keep() -> World {
    build_world(StorySource {
        rooms: vec![
            RoomRecord::new("Hall", 1, "")
                .connect(&[2])
                .with_item(ItemRecord::key(2, "Brass key", 100, ""))
                .with_item(ItemRecord::object("Candle", 103, ""))
                .with_entity(
                    EntityRecord::new("Player").with_item(ItemRecord::object("Rock", 104, "")),
                ),
            RoomRecord::new("Vault", 2, "").connect(&[1]),
        ],
        ..StorySource::default()
    })
    .expect("build keep")
}

/// How many containers in the world hold an item with this identifier.
fn copies(world: &World, item_id: i64) -> usize {
    let in_rooms = world.rooms().iter().filter(|r| r.inventory().contains(item_id));
    let on_entities = world
        .population()
        .iter()
        .filter(|e| e.inventory().contains(item_id));
    in_rooms.count() + on_entities.count()
}

#[test]
fn key_from_hand_unlocks_the_vault() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let vault = world.find_room(2).expect("vault");

    pick_up(&mut world, player, hall, 100).expect("pick up key");
    assert_eq!(unlock_with(&mut world, player, 100, vault), Ok(true));

    assert_eq!(
        world.room(vault).map(|r| r.lock_state()),
        Some(LockState::Unlocked)
    );
    assert_eq!(copies(&world, 100), 0, "key is consumed");
}

#[test]
fn plain_object_stays_with_the_player() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let vault = world.find_room(2).expect("vault");

    assert_eq!(unlock_with(&mut world, player, 104, vault), Ok(false));

    let vault_room = world.room(vault).expect("vault room");
    assert!(vault_room.is_locked());
    let rock = world
        .entity(player)
        .and_then(|p| p.inventory().get(104))
        .expect("rock handed back");
    assert_eq!(rock.name(), "Rock");
    assert_eq!(rock.opens(), None);
}

#[test]
fn second_attempt_does_not_reunlock_or_duplicate() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let vault = world.find_room(2).expect("vault");

    pick_up(&mut world, player, hall, 100).expect("pick up key");
    assert_eq!(unlock_with(&mut world, player, 100, vault), Ok(true));

    let again = unlock_with(&mut world, player, 100, vault);
    assert!(matches!(again, Err(TransferError::ItemNotHeld { item: 100, .. })));
    assert_eq!(copies(&world, 100), 0);
    assert!(!world.room(vault).expect("vault room").is_locked());
}

#[test]
fn wrong_room_keeps_the_key_intact() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");

    pick_up(&mut world, player, hall, 100).expect("pick up key");
    assert_eq!(unlock_with(&mut world, player, 100, hall), Ok(false));

    let key = world
        .entity(player)
        .and_then(|p| p.inventory().get(100))
        .expect("key handed back");
    assert_eq!(key.opens(), Some(2));
    assert!(world.room(hall).expect("hall room").is_locked());
}

#[test]
fn resolver_matches_identifiers_exactly() {
    let mut world = keep();
    let vault = world.find_room(2).expect("vault");
    let room = world.room_mut(vault).expect("vault room");

    for opens in [1, 3] {
        let outcome = try_unlock(Item::key(opens, "Bent key", 200, ""), room);
        assert!(matches!(outcome, UnlockOutcome::Rejected(_)));
        assert!(room.is_locked());
    }
    assert!(try_unlock(Item::key(2, "True key", 201, ""), room).is_unlocked());
}

#[test]
fn pickup_moves_exactly_one_instance() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");

    pick_up(&mut world, player, hall, 103).expect("pick up candle");

    assert!(!world.room(hall).expect("hall room").inventory().contains(103));
    assert!(world.entity(player).expect("player").inventory().contains(103));
    assert_eq!(copies(&world, 103), 1);

    drop_item(&mut world, player, hall, 103).expect("drop candle");
    assert!(world.room(hall).expect("hall room").inventory().contains(103));
    assert_eq!(copies(&world, 103), 1);
}

#[test]
fn failed_transfer_changes_nothing() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let vault = world.find_room(2).expect("vault");

    let err = pick_up(&mut world, player, vault, 103).unwrap_err();
    assert_eq!(
        err,
        TransferError::ItemNotHeld {
            holder: Holder::Room(vault),
            item: 103
        }
    );

    // a handle from a bigger world names no room here
    let bigger = build_world(StorySource {
        rooms: vec![
            RoomRecord::new("A", 1, ""),
            RoomRecord::new("B", 2, ""),
            RoomRecord::new("C", 3, ""),
        ],
        ..StorySource::default()
    })
    .expect("build bigger");
    let stray = bigger.find_room(3).expect("room C");

    let err = move_item(&mut world, Holder::Room(hall), Holder::Room(stray), 103).unwrap_err();
    assert_eq!(err, TransferError::UnknownRoom(stray));
    assert_eq!(copies(&world, 103), 1);
    assert!(world.room(hall).expect("hall room").inventory().contains(103));
}

#[test]
fn items_move_between_entities_and_rooms() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let vault = world.find_room(2).expect("vault");

    move_item(&mut world, Holder::Entity(player), Holder::Room(vault), 104).expect("move rock");
    assert!(world.room(vault).expect("vault room").inventory().contains(104));
    assert_eq!(copies(&world, 104), 1);
}

#[test]
fn entities_walk_between_rooms() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let vault = world.find_room(2).expect("vault");

    move_entity(&mut world, player, hall, vault).expect("walk");
    assert_eq!(world.rooms_containing(player), vec![vault]);

    let err = move_entity(&mut world, player, hall, vault).unwrap_err();
    assert_eq!(
        err,
        TransferError::EntityNotPresent {
            entity: player,
            room: hall
        }
    );
    assert_eq!(world.rooms_containing(player), vec![vault]);
}

/// A handle issued by another world with the same shape as `keep()`.
fn twin_handles() -> (storyworld::RoomId, storyworld::EntityId) {
    let twin = keep();
    (
        twin.find_room(2).expect("twin vault"),
        twin.find_entity("Player").expect("twin player"),
    )
}

#[test]
fn handles_from_another_world_are_unknown_here() {
    let mut world = keep();
    let hall = world.find_room(1).expect("hall");
    let (twin_vault, twin_player) = twin_handles();

    assert!(world.room(twin_vault).is_none());
    assert!(world.entity(twin_player).is_none());

    let err = move_item(&mut world, Holder::Room(hall), Holder::Room(twin_vault), 103).unwrap_err();
    assert_eq!(err, TransferError::UnknownRoom(twin_vault));
    assert!(world.room(hall).expect("hall room").inventory().contains(103));
    assert!(!world.rooms()[1].inventory().contains(103));
}

#[test]
fn walking_to_an_unknown_room_leaves_the_occupants_alone() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let (twin_vault, _) = twin_handles();

    let err = move_entity(&mut world, player, hall, twin_vault).unwrap_err();
    assert_eq!(err, TransferError::UnknownRoom(twin_vault));
    assert_eq!(world.room(hall).expect("hall room").occupants(), &[player]);
    assert_eq!(world.rooms_containing(player), vec![hall]);
}

#[test]
fn unlock_with_unknown_handles_changes_no_inventory() {
    let mut world = keep();
    let player = world.find_entity("Player").expect("player");
    let hall = world.find_room(1).expect("hall");
    let vault = world.find_room(2).expect("vault");
    pick_up(&mut world, player, hall, 100).expect("pick up key");
    let (twin_vault, twin_player) = twin_handles();

    let err = unlock_with(&mut world, twin_player, 100, vault).unwrap_err();
    assert_eq!(err, TransferError::UnknownEntity(twin_player));

    let err = unlock_with(&mut world, player, 100, twin_vault).unwrap_err();
    assert_eq!(err, TransferError::UnknownRoom(twin_vault));

    let held = world.entity(player).expect("player").inventory();
    assert!(held.contains(100));
    assert!(held.contains(104));
    assert_eq!(held.len(), 2);
    assert_eq!(copies(&world, 100), 1);
    assert!(world.room(vault).expect("vault room").is_locked());
}
