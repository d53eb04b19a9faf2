use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info, warn};
use storyworld::WorldError;
use storyworld::world::{World, destroy_world, init_world, validate_world};

fn print_summary(world: &World) {
    println!("{}", world.title());
    for id in world.room_ids() {
        let Some(room) = world.room(id) else { continue };

        let exits = world
            .neighbours_of(id)
            .map(|n| n.name())
            .collect::<Vec<_>>()
            .join(", ");
        let occupants = world
            .occupants_of(id)
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", ");

        println!("  [{}] {} ({:?})", room.id(), room.name(), room.lock_state());
        if !exits.is_empty() {
            println!("      exits: {}", exits);
        }
        if !occupants.is_empty() {
            println!("      occupants: {}", occupants);
        }
        for item in room.inventory().iter() {
            println!("      item: {} ({})", item.name(), item.id());
        }
    }
}

/// Load, summarize and tear down one story. Validation problems are logged
/// and counted; only a failed load is an error.
fn run(story_path: &Path) -> Result<usize, WorldError> {
    let world = init_world(story_path)?;

    print_summary(&world);

    let problems = validate_world(&world);
    for p in &problems {
        warn!("{}", p.message);
    }

    let released = destroy_world(world);
    info!(
        "released {} rooms, {} entities, {} items",
        released.rooms, released.entities, released.items
    );
    Ok(problems.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let story_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("stories/keep.toml"));

    match run(&story_path) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(n) => {
            warn!("story '{}' has {n} validation problems", story_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to load story '{}': {e}", story_path.display());
            ExitCode::FAILURE
        }
    }
}
