//! Console command execution against the running simulation.

use mc_mobs_command::{AdminCommand, CommandResult, KindFilter};
use mc_mobs_game::{Category, Host, LocalHost, Placement, Simulation};
use mc_mobs_world::{Vec3, WorldView};
use tracing::debug;

/// Parse and run one console line.
pub fn execute(sim: &mut Simulation, host: &LocalHost, line: &str) -> CommandResult {
    match AdminCommand::parse(line) {
        Ok(command) => run(sim, host, command),
        Err(e) => e.into(),
    }
}

fn run(sim: &mut Simulation, host: &LocalHost, command: AdminCommand) -> CommandResult {
    debug!("Console command: {command:?}");
    match command {
        AdminCommand::Clear { world, kinds } => {
            let categories: Vec<Category> = kinds
                .iter()
                .map(|k| match k {
                    KindFilter::Animal => Category::Animal,
                    KindFilter::Monster => Category::Monster,
                })
                .collect();
            let removed = sim.clear_creatures(world.as_deref(), &categories);
            CommandResult::ok(format!(
                "Removed {removed} creature{s}",
                s = if removed == 1 { "" } else { "s" }
            ))
        }
        AdminCommand::Count => count(sim),
        AdminCommand::Spawn {
            kind,
            position,
            world,
        } => {
            let world = world.unwrap_or_else(|| host.default_world().to_string());
            let Some(position) = position
                .map(|(x, y, z)| Vec3::new(x, y, z))
                .or_else(|| world_spawn(host, &world))
            else {
                return CommandResult::err(format!("Unknown world: {world}"));
            };
            match sim.spawn_by_command(host, &kind, Placement::at(world.as_str(), position)) {
                Ok((species, id)) => CommandResult::ok(format!(
                    "Spawned {} {id} at {position} in {world}",
                    species.name()
                )),
                Err(e) => CommandResult::err(format!("Cannot spawn {kind}: {e}")),
            }
        }
        AdminCommand::Stop => mc_mobs_command::stop(),
        AdminCommand::Help => mc_mobs_command::help(),
    }
}

fn count(sim: &mut Simulation) -> CommandResult {
    let creatures = sim.all_creatures();
    let limit = sim.config().entity.limit;
    let monsters = creatures
        .iter()
        .filter(|c| c.species.category() == Category::Monster)
        .count();
    CommandResult {
        success: true,
        messages: vec![
            format!("There are {} creatures alive (limit {limit})", creatures.len()),
            format!("  monsters: {monsters}, animals: {}", creatures.len() - monsters),
        ],
        should_stop: false,
    }
}

/// Middle of the origin cell, standing on the floor of a flat world.
fn world_spawn(host: &LocalHost, world: &str) -> Option<Vec3> {
    let voxels = host.worlds.iter().find(|w| w.name() == world)?;
    let y = voxels.floor_y().map_or(0, |floor| floor + 1);
    Some(Vec3::new(0.5, y as f32, 0.5))
}
