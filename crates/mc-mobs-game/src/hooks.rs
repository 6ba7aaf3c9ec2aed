//! Host event hooks: spawn eggs, spawner placement, block breaks and
//! explosion policy.

use mc_mobs_world::{BlockPos, Vec3};
use tracing::{debug, info};

use crate::components::{CreatureId, EntityRef};
use crate::config::ExplosionMode;
use crate::error::{PlacementError, SpawnError};
use crate::host::{GameMode, Host};
use crate::simulation::{parse_kind, Placement, Simulation};
use crate::spawn_site::SpawnSite;
use crate::species::Species;

/// Item the player is holding when interacting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldItem {
    /// Spawn egg carrying a species network id.
    SpawnEgg(u32),
    MonsterSpawner,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractAction {
    LeftClickBlock,
    RightClickBlock,
    LeftClickAir,
    RightClickAir,
    Physical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl BlockFace {
    /// Neighbor cell on this side of `pos`.
    pub fn offset(self, pos: BlockPos) -> BlockPos {
        match self {
            BlockFace::Down => pos.offset(0, -1, 0),
            BlockFace::Up => pos.offset(0, 1, 0),
            BlockFace::North => pos.offset(0, 0, -1),
            BlockFace::South => pos.offset(0, 0, 1),
            BlockFace::West => pos.offset(-1, 0, 0),
            BlockFace::East => pos.offset(1, 0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInteract {
    pub player: u64,
    pub world: String,
    /// Block that was clicked.
    pub block: BlockPos,
    pub face: Option<BlockFace>,
    pub action: InteractAction,
    pub item: HeldItem,
    pub game_mode: GameMode,
}

/// What the host should do after an interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractOutcome {
    pub cancelled: bool,
    pub consume_item: bool,
    pub spawned: Option<CreatureId>,
    pub site: Option<BlockPos>,
}

/// An explosion about to happen; hooks may cancel it or stop block damage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionPrime {
    pub source: EntityRef,
    pub world: String,
    pub position: Vec3,
    pub force: f32,
    pub block_breaking: bool,
    pub cancelled: bool,
}

impl ExplosionPrime {
    pub fn new(source: EntityRef, world: &str, position: Vec3, force: f32) -> Self {
        Self {
            source,
            world: world.to_string(),
            position,
            force,
            block_breaking: true,
            cancelled: false,
        }
    }
}

impl Simulation {
    /// Spawn eggs create a creature on the clicked face; spawners register a
    /// spawn site where they are placed.
    pub fn on_player_interact(&mut self, host: &dyn Host, event: &PlayerInteract) -> InteractOutcome {
        let mut outcome = InteractOutcome::default();
        if event.action != InteractAction::RightClickBlock {
            return outcome;
        }
        let Some(face) = event.face else {
            return outcome;
        };
        let target = face.offset(event.block);

        match event.item {
            HeldItem::SpawnEgg(network_id) => {
                outcome.cancelled = true;
                let Some(species) = Species::from_network_id(network_id) else {
                    debug!("Spawn egg with unknown creature id {network_id}");
                    return outcome;
                };
                let position = target.to_vec3().add_xyz(0.5, 0.0, 0.5);
                match self.create_entity(host, species.name(), Placement::at(&*event.world, position)) {
                    Ok(id) => {
                        outcome.spawned = Some(id);
                        outcome.consume_item = event.game_mode == GameMode::Survival;
                    }
                    Err(e) => debug!("Spawn egg from player {} failed: {e}", event.player),
                }
            }
            HeldItem::MonsterSpawner => {
                self.spawn_sites.insert(target, SpawnSite::placed());
                info!("Spawn site registered at {target}");
                outcome.site = Some(target);
            }
            HeldItem::Other => {}
        }
        outcome
    }

    /// Drop the spawn site at `pos` unless the break was cancelled.
    ///
    /// Returns `true` if a site was removed.
    pub fn on_block_break(&mut self, pos: BlockPos, cancelled: bool) -> bool {
        if cancelled {
            return false;
        }
        let removed = self.spawn_sites.remove(&pos).is_some();
        if removed {
            info!("Spawn site at {pos} removed");
        }
        removed
    }

    /// Apply the explosion policy.
    pub fn on_explosion_prime(&self, event: &mut ExplosionPrime) {
        match self.config.explode {
            ExplosionMode::Disabled => event.cancelled = true,
            ExplosionMode::EntityOnly => event.block_breaking = false,
            ExplosionMode::Full => {}
        }
    }

    /// Spawn a creature for an administrator: `kind` is a name,
    /// identifier or network id.
    pub fn spawn_by_command(
        &mut self,
        host: &dyn Host,
        kind: &str,
        placement: Placement,
    ) -> Result<(Species, CreatureId), SpawnError> {
        let species =
            parse_kind(kind).ok_or_else(|| PlacementError::UnknownSpecies(kind.to_string()))?;
        let id = self.create_entity(host, species.name(), placement)?;
        Ok((species, id))
    }
}
