//! Governor spawn pass: spawn sites, natural spawns around players and the
//! load-adaptive AI period.

use mc_mobs_world::{BlockPos, Vec3, WorldView};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::components::CreatureId;
use crate::error::{PlacementError, SpawnError};
use crate::host::Host;
use crate::simulation::{Placement, Simulation};
use crate::species::NATURAL_ROSTER;

/// Ticks between AI passes for the given tick usage (percent).
pub fn ai_update_period(tick_usage: f32) -> u32 {
    match tick_usage {
        u if u <= 60.0 => 1,
        u if u <= 70.0 => 2,
        u if u <= 80.0 => 3,
        u if u <= 90.0 => 4,
        _ => 5,
    }
}

/// How tall the block under a spawn point may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorRule {
    /// A full block.
    Exact,
    /// Anything with a box no taller than a full block.
    AtMostOne,
}

fn is_open(view: &dyn WorldView, pos: BlockPos) -> bool {
    view.bounding_box(pos).is_none_or(|bb| bb.height() <= 0.0)
}

/// A creature fits at `pos`: the cell and the one above are open and the
/// one below satisfies `rule`.
pub fn spot_fits(view: &dyn WorldView, pos: BlockPos, rule: FloorRule) -> bool {
    let floor = view.bounding_box(pos.down()).is_some_and(|bb| match rule {
        FloorRule::Exact => bb.height() == 1.0,
        FloorRule::AtMostOne => bb.height() <= 1.0,
    });
    floor && is_open(view, pos) && is_open(view, pos.up())
}

impl Simulation {
    /// One firing of the spawn timer.
    pub(crate) fn run_spawn_pass(&mut self, host: &dyn Host) {
        self.spawn_from_sites(host);
        if self.config.entity.autospawn {
            self.spawn_around_players(host);
        }
    }

    fn spawn_from_sites(&mut self, host: &dyn Host) {
        let pruned = self.spawn_sites.prune_empty();
        if pruned > 0 {
            debug!("Pruned {pruned} empty spawn sites");
        }
        let world = host.default_world().to_string();
        let sites: Vec<_> = self
            .spawn_sites
            .iter()
            .map(|(pos, site)| (*pos, site.clone()))
            .collect();

        for (origin, site) in sites {
            if self.rng.gen_range(1..=4) > 1 {
                continue;
            }
            let r = site.radius.max(0);
            let point = origin.offset(
                self.rng.gen_range(-r..=r),
                self.rng.gen_range(-r..=r),
                self.rng.gen_range(-r..=r),
            );
            let Some(kind) = site.mob_list.choose(&mut self.rng) else {
                continue;
            };
            if let Err(e) = self.spawn_at(host, &world, point, FloorRule::Exact, kind) {
                debug!("Spawn site {origin} failed: {e}");
            }
        }
    }

    fn spawn_around_players(&mut self, host: &dyn Host) {
        let radius = self.config.spawn.radius.max(0);
        let players: Vec<(String, Vec3)> = host
            .online_players()
            .iter()
            .filter(|p| p.is_present())
            .map(|p| (p.world.clone(), p.position))
            .collect();

        for (world, position) in players {
            if self.rng.gen_range(0..=4) > 0 {
                continue;
            }
            let point = position
                .add_xyz(
                    self.rng.gen_range(-radius..=radius) as f32,
                    self.rng.gen_range(-radius..=radius) as f32,
                    self.rng.gen_range(-radius..=radius) as f32,
                )
                .block_pos();
            let row = &NATURAL_ROSTER[self.rng.gen_range(0..=1)];
            let Some(species) = row[self.rng.gen_range(0..=5)] else {
                continue;
            };
            if let Err(e) = self.spawn_at(host, &world, point, FloorRule::AtMostOne, species.name()) {
                debug!("Natural spawn near {position} failed: {e}");
            }
        }
    }

    /// Probe `point` and create a creature standing in the middle of it.
    fn spawn_at(
        &mut self,
        host: &dyn Host,
        world: &str,
        point: BlockPos,
        rule: FloorRule,
        kind: &str,
    ) -> Result<CreatureId, SpawnError> {
        let view = host
            .world(world)
            .ok_or_else(|| PlacementError::UnknownWorld(world.to_string()))?;
        if !spot_fits(view, point, rule) {
            return Err(SpawnError::Obstructed(point));
        }
        let position = point.to_vec3().add_xyz(0.5, 0.0, 0.5);
        self.create_entity(host, kind, Placement::at(world, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_mobs_world::{BlockKind, VoxelWorld};

    #[test]
    fn ai_period_follows_load() {
        assert_eq!(ai_update_period(0.0), 1);
        assert_eq!(ai_update_period(55.0), 1);
        assert_eq!(ai_update_period(60.0), 1);
        assert_eq!(ai_update_period(65.0), 2);
        assert_eq!(ai_update_period(75.0), 3);
        assert_eq!(ai_update_period(90.0), 4);
        assert_eq!(ai_update_period(95.0), 5);
        assert_eq!(ai_update_period(100.0), 5);
    }

    #[test]
    fn floor_and_open_space_pass() {
        let world = VoxelWorld::flat("world", 3, 1);
        assert!(spot_fits(&world, BlockPos::new(2, 4, 2), FloorRule::Exact));
        assert!(spot_fits(&world, BlockPos::new(2, 4, 2), FloorRule::AtMostOne));
    }

    #[test]
    fn obstruction_fails() {
        let mut world = VoxelWorld::flat("world", 3, 1);
        world.set_block(BlockPos::new(2, 4, 2), BlockKind::Solid);
        world.set_block(BlockPos::new(2, 5, 2), BlockKind::Solid);
        assert!(!spot_fits(&world, BlockPos::new(2, 4, 2), FloorRule::Exact));
        // Only the head cell blocked is still a failure.
        world.reset_block(BlockPos::new(2, 4, 2));
        assert!(!spot_fits(&world, BlockPos::new(2, 4, 2), FloorRule::AtMostOne));
    }

    #[test]
    fn floor_rules_differ_on_slabs() {
        let mut world = VoxelWorld::flat("world", 3, 1);
        world.set_block(BlockPos::new(1, 4, 1), BlockKind::Slab);
        let above = BlockPos::new(1, 5, 1);
        assert!(!spot_fits(&world, above, FloorRule::Exact));
        assert!(spot_fits(&world, above, FloorRule::AtMostOne));
    }

    #[test]
    fn no_floor_fails() {
        let world = VoxelWorld::flat("world", 3, 1);
        assert!(!spot_fits(&world, BlockPos::new(2, 10, 2), FloorRule::AtMostOne));
        // Liquids have no box to stand on.
        let mut wet = VoxelWorld::flat("world", 3, 1);
        wet.set_block(BlockPos::new(2, 3, 2), BlockKind::Water);
        assert!(!spot_fits(&wet, BlockPos::new(2, 4, 2), FloorRule::AtMostOne));
    }
}
