//! Simulation context: creature registry, governor timers and the event bus.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy_ecs::prelude::{Entity, Resource, World};
use mc_mobs_world::{Vec3, WorldView};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::ai::spawning::ai_update_period;
use crate::ai::system::{self, UpdateContext, UpdateOutcome};
use crate::combat::{self, AttackOutcome, DamageCause, DamageEvent, EntityEvent};
use crate::components::{Body, Creature, CreatureId, EntityRef};
use crate::config::GovernorConfig;
use crate::error::{PlacementError, SpawnError, VetoReason};
use crate::frame::CreatureFrame;
use crate::hooks::ExplosionPrime;
use crate::host::Host;
use crate::movement::{Neighbor, Surroundings};
use crate::spawn_site::SpawnSites;
use crate::species::{Category, Species};

/// Explosion strength of a creeper.
pub const CREEPER_EXPLOSION_FORCE: f32 = 3.0;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Outgoing events queued for the host to broadcast.
#[derive(Resource, Default)]
pub struct OutgoingEvents {
    pub events: Vec<SimEvent>,
}

/// Simulation tick counter.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Creature identity allocator.
#[derive(Resource)]
pub struct EntityIdAllocator {
    next: AtomicU64,
}

impl EntityIdAllocator {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    pub fn allocate(&self) -> CreatureId {
        CreatureId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity → ECS entity for every registered creature, in identity order.
#[derive(Resource, Default)]
pub struct CreatureIndex(pub BTreeMap<CreatureId, Entity>);

// ---------------------------------------------------------------------------
// Events (simulation → host)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Died,
    Exploded,
    Cleared,
    WorldUnloaded,
    Despawned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A creature was admitted; show it to players.
    CreatureSpawned {
        id: CreatureId,
        species: Species,
        world: String,
        position: Vec3,
        yaw: f32,
        pitch: f32,
        health: f32,
    },
    CreatureMoved {
        id: CreatureId,
        position: Vec3,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    },
    /// Hurt or death animation.
    CreatureAnimation { id: CreatureId, event: EntityEvent },
    CreatureRemoved {
        id: CreatureId,
        reason: RemovalReason,
    },
    /// Melee hit on a player; the host applies the damage.
    CreatureAttackPlayer {
        id: CreatureId,
        player: u64,
        damage: f32,
    },
    /// An explosion the host should carry out.
    ExplosionPrimed {
        source: CreatureId,
        world: String,
        position: Vec3,
        force: f32,
        block_breaking: bool,
    },
}

/// Where a new creature should appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub world: String,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Placement {
    pub fn at(world: impl Into<String>, position: Vec3) -> Self {
        Self {
            world: world.into(),
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Read-only view of a creature for commands and newly joined players.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub species: Species,
    pub world: String,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub on_ground: bool,
    pub movement_enabled: bool,
}

impl CreatureSnapshot {
    fn of(frame: &CreatureFrame) -> Self {
        Self {
            id: frame.id,
            species: frame.species,
            world: frame.world.clone(),
            position: frame.body.position,
            yaw: frame.body.yaw,
            pitch: frame.body.pitch,
            health: frame.vitals.health,
            max_health: frame.vitals.max_health,
            on_ground: frame.body.on_ground,
            movement_enabled: frame.brain.movement_enabled,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Owns every creature, the governor settings and the spawn sites.
pub struct Simulation {
    pub(crate) world: World,
    pub(crate) config: GovernorConfig,
    pub(crate) spawn_sites: SpawnSites,
    pub(crate) rng: ChaCha8Rng,
    spawn_timer: u32,
    ai_timer: u32,
}

impl Simulation {
    pub fn new(config: GovernorConfig, spawn_sites: SpawnSites, seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(EntityIdAllocator::new(1));
        world.insert_resource(CreatureIndex::default());

        Self {
            world,
            config,
            spawn_sites,
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_timer: 0,
            ai_timer: 0,
        }
    }

    /// One server tick: spawn timer, then AI timer.
    pub fn tick(&mut self, host: &dyn Host) {
        self.world.resource_mut::<TickCounter>().0 += 1;

        self.spawn_timer += 1;
        if self.spawn_timer >= self.config.spawn.tick.max(1) {
            self.spawn_timer = 0;
            self.run_spawn_pass(host);
        }

        self.ai_timer += 1;
        if self.ai_timer >= ai_update_period(host.tick_usage()) {
            self.ai_timer = 0;
            self.run_ai_pass(host);
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickCounter>().0
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.world.resource_mut::<OutgoingEvents>().events)
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn spawn_sites(&self) -> &SpawnSites {
        &self.spawn_sites
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.world.resource_mut::<OutgoingEvents>().events.push(event);
    }

    // -- Registry ------------------------------------------------------------

    pub fn creature_count(&self) -> usize {
        self.world.resource::<CreatureIndex>().0.len()
    }

    pub fn creature_ids(&self) -> Vec<CreatureId> {
        self.world.resource::<CreatureIndex>().0.keys().copied().collect()
    }

    fn entity_of(&self, id: CreatureId) -> Option<Entity> {
        self.world.resource::<CreatureIndex>().0.get(&id).copied()
    }

    fn limit_reached(&self) -> bool {
        self.creature_count() >= self.config.entity.limit as usize
    }

    pub fn snapshot(&self, id: CreatureId) -> Option<CreatureSnapshot> {
        let entity = self.entity_of(id)?;
        CreatureFrame::load(&self.world, entity).map(|f| CreatureSnapshot::of(&f))
    }

    pub fn all_creatures(&mut self) -> Vec<CreatureSnapshot> {
        self.frames().iter().map(|(_, f)| CreatureSnapshot::of(f)).collect()
    }

    /// Frames of every registered creature, in identity order.
    fn frames(&mut self) -> Vec<(Entity, CreatureFrame)> {
        let mut frames = CreatureFrame::load_all(&mut self.world);
        let index = &self.world.resource::<CreatureIndex>().0;
        frames.retain(|(entity, frame)| index.get(&frame.id) == Some(entity));
        frames
    }

    /// Create a creature of `kind` (name, identifier or network id).
    ///
    /// Rejected up front when the cap is met, the world or chunk is missing
    /// or the species is unknown; afterwards it still has to pass the
    /// admission hook.
    pub fn create_entity(
        &mut self,
        host: &dyn Host,
        kind: &str,
        placement: Placement,
    ) -> Result<CreatureId, SpawnError> {
        if self.limit_reached() {
            return Err(SpawnError::CapacityExceeded {
                limit: self.config.entity.limit,
            });
        }
        let view = host
            .world(&placement.world)
            .ok_or_else(|| PlacementError::UnknownWorld(placement.world.clone()))?;
        let chunk = placement.position.block_pos().chunk_pos();
        if !view.is_chunk_generated(chunk) {
            return Err(PlacementError::ChunkNotGenerated(chunk).into());
        }
        let species = parse_kind(kind).ok_or_else(|| PlacementError::UnknownSpecies(kind.to_string()))?;

        let id = self.world.resource::<EntityIdAllocator>().allocate();
        let traits = species.traits();
        let body = Body::new(
            placement.position,
            placement.yaw,
            placement.pitch,
            traits.width,
            traits.height,
        );
        let frame = CreatureFrame::spawn(id, species, view.name(), body, self.current_tick());
        let entity = frame.insert_into(&mut self.world);
        self.on_entity_spawn(entity)?;
        Ok(id)
    }

    /// Admission hook for a freshly constructed creature.
    ///
    /// Vetoed creatures are despawned on the spot; admitted ones are
    /// registered and announced.
    pub fn on_entity_spawn(&mut self, entity: Entity) -> Result<CreatureId, VetoReason> {
        let Some(frame) = CreatureFrame::load(&self.world, entity) else {
            return Err(VetoReason::LimitReached);
        };
        let category = frame.species.category();
        let enabled = match category {
            Category::Animal => self.config.spawn.animal,
            Category::Monster => self.config.spawn.mob,
        };
        let veto = if !enabled {
            Some(VetoReason::CategoryDisabled(category))
        } else if self.limit_reached() {
            Some(VetoReason::LimitReached)
        } else {
            None
        };
        if let Some(reason) = veto {
            debug!("Vetoed {} {}: {reason}", frame.species.name(), frame.id);
            self.world.despawn(entity);
            return Err(reason);
        }

        self.world
            .resource_mut::<CreatureIndex>()
            .0
            .insert(frame.id, entity);
        debug!(
            "Spawned {} {} in {} at {}",
            frame.species.name(),
            frame.id,
            frame.world,
            frame.body.position
        );
        self.emit(SimEvent::CreatureSpawned {
            id: frame.id,
            species: frame.species,
            world: frame.world.clone(),
            position: frame.body.position,
            yaw: frame.body.yaw,
            pitch: frame.body.pitch,
            health: frame.vitals.health,
        });
        Ok(frame.id)
    }

    /// Deregister a creature and drop its entity. Returns `false` if unknown.
    pub fn on_entity_despawn(&mut self, id: CreatureId) -> bool {
        let Some(entity) = self.world.resource_mut::<CreatureIndex>().0.remove(&id) else {
            return false;
        };
        if self.world.get::<Creature>(entity).is_some() {
            self.world.despawn(entity);
        }
        true
    }

    /// Remove a creature immediately, bypassing the dying state.
    pub fn remove_creature(&mut self, id: CreatureId, reason: RemovalReason) -> bool {
        if !self.on_entity_despawn(id) {
            return false;
        }
        debug!("Removed creature {id} ({reason:?})");
        self.emit(SimEvent::CreatureRemoved { id, reason });
        true
    }

    /// Remove every creature matching the world and categories.
    ///
    /// `None` matches all worlds; an empty `kinds` matches every category.
    pub fn clear_creatures(&mut self, world: Option<&str>, kinds: &[Category]) -> usize {
        let doomed: Vec<CreatureId> = self
            .frames()
            .into_iter()
            .filter(|(_, f)| world.is_none_or(|w| f.world == w))
            .filter(|(_, f)| kinds.is_empty() || kinds.contains(&f.species.category()))
            .map(|(_, f)| f.id)
            .collect();
        for &id in &doomed {
            self.remove_creature(id, RemovalReason::Cleared);
        }
        if !doomed.is_empty() {
            info!("Cleared {} creatures", doomed.len());
        }
        doomed.len()
    }

    /// Drop every creature living in a world that is going away.
    pub fn unload_world(&mut self, world: &str) -> usize {
        let doomed: Vec<CreatureId> = self
            .frames()
            .into_iter()
            .filter(|(_, f)| f.world == world)
            .map(|(_, f)| f.id)
            .collect();
        for &id in &doomed {
            self.remove_creature(id, RemovalReason::WorldUnloaded);
        }
        doomed.len()
    }

    /// Enable or freeze a creature's movement. Returns `false` if unknown.
    pub fn set_movement(&mut self, id: CreatureId, enabled: bool) -> bool {
        let Some(entity) = self.entity_of(id) else {
            return false;
        };
        let Some(mut frame) = CreatureFrame::load(&self.world, entity) else {
            return false;
        };
        frame.brain.movement_enabled = enabled;
        frame.store(&mut self.world, entity);
        true
    }

    /// Deliver a hit from outside the simulation.
    pub fn attack_creature(&mut self, id: CreatureId, mut event: DamageEvent) -> Option<AttackOutcome> {
        let entity = self.entity_of(id)?;
        let mut frame = CreatureFrame::load(&self.world, entity)?;
        let outcome = combat::attack(&mut frame, &mut event);
        frame.store(&mut self.world, entity);
        if let Some(animation) = outcome.animation() {
            self.emit(SimEvent::CreatureAnimation {
                id,
                event: animation,
            });
        }
        Some(outcome)
    }

    // -- AI pass ---------------------------------------------------------------

    /// Give every registered creature one update.
    ///
    /// Runs over a snapshot of the registry: creatures removed during the
    /// pass are skipped and new ones wait for the next pass.
    fn run_ai_pass(&mut self, host: &dyn Host) {
        let current_tick = self.current_tick();
        let difficulty = host.difficulty();
        let players = host.online_players();

        let entries: Vec<(CreatureId, Entity)> = self
            .world
            .resource::<CreatureIndex>()
            .0
            .iter()
            .map(|(&id, &e)| (id, e))
            .collect();
        let mut neighbors: Vec<Neighbor> = self.frames().iter().map(|(_, f)| Neighbor::of(f)).collect();

        for (id, entity) in entries {
            if self.entity_of(id).is_none() {
                continue;
            }
            let Some(mut frame) = CreatureFrame::load(&self.world, entity) else {
                continue;
            };
            let Some(view) = host.world(&frame.world) else {
                continue;
            };

            let mut events = Vec::new();
            let ctx = UpdateContext {
                current_tick,
                difficulty,
                env: Surroundings {
                    view,
                    players,
                    neighbors: &neighbors,
                },
            };
            let mut outcome = system::update_creature(&mut frame, &ctx, &mut self.rng, &mut events);

            if outcome == UpdateOutcome::Explode && !self.prime_explosion(&frame, &mut events) {
                frame.combat.fuse_ticks = 0;
                outcome = UpdateOutcome::Updated;
            }

            frame.store(&mut self.world, entity);
            if let Some(slot) = neighbors.iter_mut().find(|n| n.id == id) {
                *slot = Neighbor::of(&frame);
            }
            self.world
                .resource_mut::<OutgoingEvents>()
                .events
                .append(&mut events);

            match outcome {
                UpdateOutcome::Updated => {}
                UpdateOutcome::Remove(reason) => {
                    self.remove_creature(id, reason);
                    neighbors.retain(|n| n.id != id);
                }
                UpdateOutcome::Explode => {
                    self.remove_creature(id, RemovalReason::Exploded);
                    neighbors.retain(|n| n.id != id);
                    let hit = self.damage_around(id, &frame.world, frame.body.position, CREEPER_EXPLOSION_FORCE);
                    for victim in hit {
                        if let Some(snapshot) = self.snapshot(victim) {
                            if let Some(slot) = neighbors.iter_mut().find(|n| n.id == victim) {
                                slot.alive = snapshot.health > 0.0;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Hurt every living creature within reach of an explosion.
    ///
    /// Returns the creatures that were hit.
    fn damage_around(&mut self, source: CreatureId, world: &str, center: Vec3, force: f32) -> Vec<CreatureId> {
        let victims: Vec<(CreatureId, f32)> = self
            .frames()
            .into_iter()
            .filter(|(_, f)| f.id != source && f.world == world && f.is_alive())
            .map(|(_, f)| (f.id, explosion_damage(force, f.body.position.distance(&center))))
            .filter(|&(_, amount)| amount > 0.0)
            .collect();
        for &(id, amount) in &victims {
            self.attack_creature(id, DamageEvent::new(DamageCause::Explosion, amount));
        }
        victims.into_iter().map(|(id, _)| id).collect()
    }

    /// Run the explosion policy for a creature whose fuse burnt down.
    ///
    /// Returns `false` when the explosion was cancelled.
    fn prime_explosion(&self, frame: &CreatureFrame, events: &mut Vec<SimEvent>) -> bool {
        let mut prime = ExplosionPrime::new(
            EntityRef::Creature(frame.id),
            &frame.world,
            frame.body.position,
            CREEPER_EXPLOSION_FORCE,
        );
        self.on_explosion_prime(&mut prime);
        if prime.cancelled {
            debug!("Explosion of {} cancelled", frame.id);
            return false;
        }
        events.push(SimEvent::ExplosionPrimed {
            source: frame.id,
            world: prime.world,
            position: prime.position,
            force: prime.force,
            block_breaking: prime.block_breaking,
        });
        true
    }
}

/// Damage of an explosion of `force` at `distance` from its center, or zero
/// beyond its reach of `2 * force`.
pub fn explosion_damage(force: f32, distance: f32) -> f32 {
    let impact = 1.0 - distance / (force * 2.0);
    if impact <= 0.0 {
        return 0.0;
    }
    ((impact * impact + impact) / 2.0 * 8.0 * force + 1.0).floor()
}

/// Species by name, identifier or network id.
pub fn parse_kind(kind: &str) -> Option<Species> {
    Species::parse(kind).or_else(|| kind.trim().parse().ok().and_then(Species::from_network_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageCause;
    use crate::config::ExplosionMode;
    use crate::host::{LocalHost, PlayerSnapshot};
    use mc_mobs_world::{BlockKind, BlockPos, VoxelWorld};

    fn host() -> LocalHost {
        LocalHost::new(VoxelWorld::flat("world", 3, 2))
    }

    fn sim_with(config: GovernorConfig) -> Simulation {
        Simulation::new(config, SpawnSites::new(), 42)
    }

    fn sim() -> Simulation {
        sim_with(GovernorConfig::default())
    }

    fn at(x: f32, z: f32) -> Placement {
        Placement::at("world", Vec3::new(x, 4.0, z))
    }

    #[test]
    fn create_registers_and_announces() {
        let host = host();
        let mut sim = sim();
        let id = sim.create_entity(&host, "zombie", at(0.5, 0.5)).unwrap();
        assert_eq!(sim.creature_count(), 1);
        assert_eq!(sim.creature_ids(), vec![id]);
        let snap = sim.snapshot(id).unwrap();
        assert_eq!(snap.species, Species::Zombie);
        assert_eq!(snap.health, 20.0);
        assert!(matches!(
            sim.drain_events().as_slice(),
            [SimEvent::CreatureSpawned { species: Species::Zombie, .. }]
        ));
    }

    #[test]
    fn kind_accepts_names_identifiers_and_ids() {
        assert_eq!(parse_kind("Cow"), Some(Species::Cow));
        assert_eq!(parse_kind("minecraft:zombie_pigman"), Some(Species::PigZombie));
        assert_eq!(parse_kind("38"), Some(Species::Enderman));
        assert_eq!(parse_kind("99"), None);
        assert_eq!(parse_kind("dragon"), None);
    }

    #[test]
    fn limit_of_one_rejects_second_creature() {
        let host = host();
        let mut config = GovernorConfig::default();
        config.entity.limit = 1;
        let mut sim = sim_with(config);
        sim.create_entity(&host, "pig", at(0.5, 0.5)).unwrap();
        let err = sim.create_entity(&host, "pig", at(2.5, 0.5)).unwrap_err();
        assert_eq!(err, SpawnError::CapacityExceeded { limit: 1 });
        assert_eq!(sim.creature_count(), 1);
    }

    #[test]
    fn invalid_placements_are_rejected() {
        let host = host();
        let mut sim = sim();
        assert_eq!(
            sim.create_entity(&host, "cow", at(500.5, 0.5)),
            Err(SpawnError::InvalidPlacement(PlacementError::ChunkNotGenerated(
                mc_mobs_world::ChunkPos::new(31, 0)
            )))
        );
        assert_eq!(
            sim.create_entity(&host, "dragon", at(0.5, 0.5)),
            Err(SpawnError::InvalidPlacement(PlacementError::UnknownSpecies(
                "dragon".into()
            )))
        );
        assert!(matches!(
            sim.create_entity(&host, "cow", Placement::at("nether", Vec3::ZERO)),
            Err(SpawnError::InvalidPlacement(PlacementError::UnknownWorld(_)))
        ));
        assert_eq!(sim.creature_count(), 0);
    }

    #[test]
    fn disabled_category_is_vetoed() {
        let host = host();
        let mut config = GovernorConfig::default();
        config.spawn.mob = false;
        let mut sim = sim_with(config);
        assert_eq!(
            sim.create_entity(&host, "creeper", at(0.5, 0.5)),
            Err(SpawnError::PolicyVeto(VetoReason::CategoryDisabled(
                Category::Monster
            )))
        );
        assert_eq!(sim.creature_count(), 0);
        assert!(sim.drain_events().is_empty());
        assert!(sim.create_entity(&host, "cow", at(0.5, 0.5)).is_ok());
    }

    #[test]
    fn dead_creature_is_removed_after_dying() {
        let mut host = host();
        host.tick_usage = 10.0;
        let mut sim = sim();
        let id = sim.create_entity(&host, "chicken", at(0.5, 0.5)).unwrap();
        let outcome = sim.attack_creature(id, DamageEvent::new(DamageCause::Custom, 100.0));
        assert_eq!(outcome, Some(AttackOutcome::Applied(EntityEvent::Death)));
        sim.drain_events();

        for _ in 0..24 {
            sim.tick(&host);
        }
        assert_eq!(sim.creature_count(), 1);
        sim.tick(&host);
        assert_eq!(sim.creature_count(), 0);
        assert!(sim.drain_events().contains(&SimEvent::CreatureRemoved {
            id,
            reason: RemovalReason::Died
        }));
    }

    #[test]
    fn frozen_creature_stays_put() {
        let mut host = host();
        host.add_player(PlayerSnapshot::new(1, "Steve", "world", Vec3::new(4.5, 4.0, 0.5)));
        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        let mut sim = sim_with(config);
        let id = sim.create_entity(&host, "zombie", at(0.5, 0.5)).unwrap();
        assert!(sim.set_movement(id, false));
        for _ in 0..40 {
            sim.tick(&host);
        }
        let snap = sim.snapshot(id).unwrap();
        assert_eq!(snap.position, Vec3::new(0.5, 4.0, 0.5));
        assert!(!snap.movement_enabled);
    }

    #[test]
    fn zombie_hits_player_for_difficulty_damage() {
        let mut host = host();
        host.add_player(PlayerSnapshot::new(1, "Steve", "world", Vec3::new(1.0, 4.0, 0.5)));
        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        let mut sim = sim_with(config);
        let id = sim.create_entity(&host, "zombie", at(0.5, 0.5)).unwrap();
        for _ in 0..20 {
            sim.tick(&host);
        }
        let hits: Vec<f32> = sim
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::CreatureAttackPlayer { id: from, player: 1, damage } if from == id => {
                    Some(damage)
                }
                _ => None,
            })
            .collect();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|&d| d == 4.0));
    }

    #[test]
    fn clear_by_world_and_category() {
        let mut host = host();
        host.add_world(VoxelWorld::flat("other", 3, 1));
        let mut sim = sim();
        sim.create_entity(&host, "cow", at(0.5, 0.5)).unwrap();
        sim.create_entity(&host, "zombie", at(2.5, 0.5)).unwrap();
        sim.create_entity(&host, "zombie", Placement::at("other", Vec3::new(0.5, 4.0, 0.5)))
            .unwrap();

        assert_eq!(sim.clear_creatures(Some("world"), &[Category::Monster]), 1);
        assert_eq!(sim.creature_count(), 2);
        assert_eq!(sim.clear_creatures(None, &[Category::Monster]), 1);
        assert_eq!(sim.clear_creatures(None, &[]), 1);
        assert_eq!(sim.creature_count(), 0);
    }

    #[test]
    fn unload_world_drops_its_creatures() {
        let mut host = host();
        host.add_world(VoxelWorld::flat("other", 3, 1));
        let mut sim = sim();
        sim.create_entity(&host, "cow", at(0.5, 0.5)).unwrap();
        let gone = sim
            .create_entity(&host, "cow", Placement::at("other", Vec3::new(0.5, 4.0, 0.5)))
            .unwrap();
        sim.drain_events();
        assert_eq!(sim.unload_world("other"), 1);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::CreatureRemoved {
                id: gone,
                reason: RemovalReason::WorldUnloaded
            }]
        );
    }

    #[test]
    fn external_despawn_deregisters() {
        let host = host();
        let mut sim = sim();
        let id = sim.create_entity(&host, "sheep", at(0.5, 0.5)).unwrap();
        assert!(sim.on_entity_despawn(id));
        assert!(!sim.on_entity_despawn(id));
        assert_eq!(sim.creature_count(), 0);
        assert!(sim.snapshot(id).is_none());
        assert!(sim.attack_creature(id, DamageEvent::new(DamageCause::Custom, 1.0)).is_none());
    }

    #[test]
    fn population_never_exceeds_limit() {
        let mut host = host();
        for i in 0..4 {
            host.add_player(PlayerSnapshot::new(i, format!("p{i}"), "world", Vec3::new(0.5, 4.0, 0.5)));
        }
        let mut config = GovernorConfig::default();
        config.entity.limit = 5;
        config.spawn.tick = 1;
        config.spawn.radius = 10;
        let mut sim = sim_with(config);
        for _ in 0..400 {
            sim.tick(&host);
            assert!(sim.creature_count() <= 5);
        }
        assert!(sim.creature_count() > 0);
    }

    #[test]
    fn creeper_explosion_follows_policy() {
        let mut host = host();
        host.add_player(PlayerSnapshot::new(1, "Steve", "world", Vec3::new(2.5, 4.0, 0.5)));

        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        config.explode = ExplosionMode::EntityOnly;
        let mut sim = sim_with(config);
        let id = sim.create_entity(&host, "creeper", at(0.5, 0.5)).unwrap();
        for _ in 0..40 {
            sim.tick(&host);
        }
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::ExplosionPrimed { source, block_breaking: false, .. } if *source == id
        )));
        assert!(events.contains(&SimEvent::CreatureRemoved {
            id,
            reason: RemovalReason::Exploded
        }));
        assert_eq!(sim.creature_count(), 0);
    }

    #[test]
    fn explosion_damage_falls_off_with_distance() {
        assert_eq!(explosion_damage(3.0, 0.0), 25.0);
        assert_eq!(explosion_damage(3.0, 3.0), 10.0);
        assert!(explosion_damage(3.0, 5.9) >= 1.0);
        assert_eq!(explosion_damage(3.0, 6.0), 0.0);
        assert_eq!(explosion_damage(3.0, 12.0), 0.0);
    }

    #[test]
    fn explosion_hurts_nearby_creatures() {
        let mut host = host();
        host.add_player(PlayerSnapshot::new(1, "Steve", "world", Vec3::new(2.5, 4.0, 0.5)));
        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        let mut sim = sim_with(config);
        let creeper = sim.create_entity(&host, "creeper", at(0.5, 0.5)).unwrap();
        let cow = sim.create_entity(&host, "cow", at(0.5, 1.5)).unwrap();
        let far_cow = sim.create_entity(&host, "cow", at(20.5, 20.5)).unwrap();
        sim.set_movement(cow, false);
        sim.set_movement(far_cow, false);
        for _ in 0..40 {
            sim.tick(&host);
        }

        let events = sim.drain_events();
        let primed = events
            .iter()
            .position(|e| matches!(e, SimEvent::ExplosionPrimed { source, .. } if *source == creeper))
            .expect("creeper exploded");
        assert!(events[primed..]
            .iter()
            .any(|e| matches!(e, SimEvent::CreatureAnimation { id, .. } if *id == cow)));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SimEvent::CreatureAnimation { id, .. } if *id == far_cow)));
        assert!(sim.snapshot(cow).map_or(true, |c| c.health < 10.0));
        assert_eq!(sim.snapshot(far_cow).unwrap().health, 10.0);
    }

    #[test]
    fn cancelled_explosion_keeps_creeper() {
        let mut host = host();
        host.add_player(PlayerSnapshot::new(1, "Steve", "world", Vec3::new(2.5, 4.0, 0.5)));
        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        config.explode = ExplosionMode::Disabled;
        let mut sim = sim_with(config);
        sim.create_entity(&host, "creeper", at(0.5, 0.5)).unwrap();
        for _ in 0..100 {
            sim.tick(&host);
        }
        assert_eq!(sim.creature_count(), 1);
        assert!(!sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::ExplosionPrimed { .. })));
    }

    #[test]
    fn site_spawns_only_on_open_ground() {
        let mut host = host();
        let mut config = GovernorConfig::default();
        config.entity.autospawn = false;
        config.spawn.tick = 1;
        let mut sites = SpawnSites::new();
        sites.insert(
            BlockPos::new(0, 4, 0),
            crate::spawn_site::SpawnSite {
                radius: 0,
                mob_list: vec!["Cow".into()],
            },
        );
        let mut sim = Simulation::new(config, sites, 7);

        // Two blocks stacked on the only candidate point.
        host.set_block("world", BlockPos::new(0, 4, 0), BlockKind::Solid);
        host.set_block("world", BlockPos::new(0, 5, 0), BlockKind::Solid);
        for _ in 0..40 {
            sim.tick(&host);
        }
        assert_eq!(sim.creature_count(), 0);

        host.world_mut("world").unwrap().reset_block(BlockPos::new(0, 4, 0));
        host.world_mut("world").unwrap().reset_block(BlockPos::new(0, 5, 0));
        for _ in 0..40 {
            sim.tick(&host);
        }
        assert!(sim.creature_count() > 0);
        assert!(sim.all_creatures().iter().all(|c| c.species == Species::Cow));
    }
}
