//! Per-creature update: targeting, movement, combat follow-up and
//! environment damage.

use rand::Rng;

use crate::combat::{self, AttackOutcome, DamageCause, DamageEvent};
use crate::frame::CreatureFrame;
use crate::host::Difficulty;
use crate::movement::{self, Surroundings};
use crate::simulation::{RemovalReason, SimEvent};

use super::targeting::{self, Goal};

/// Dying creatures are removed after this many ticks.
pub const DEATH_TICKS: i32 = 25;

/// Minimum ticks between two melee hits.
pub const MELEE_COOLDOWN: i32 = 16;

/// Melee reach, squared.
pub const MELEE_RANGE_SQ: f32 = 0.81;

/// Creepers arm within this squared distance.
pub const FUSE_RANGE_SQ: f32 = 9.0;
pub const FUSE_TICKS: i32 = 30;

/// Wander timer value that forces a new wander goal.
const WANDER_EXPIRED: i32 = 800;

/// Added to the wander timer when the creature made no progress on an axis.
const STUCK_PENALTY: i32 = 20;

/// Inputs shared by every creature in one AI pass.
pub struct UpdateContext<'a> {
    pub current_tick: u64,
    pub difficulty: Difficulty,
    pub env: Surroundings<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Remove(RemovalReason),
    /// Fuse burnt down; the caller decides whether the explosion goes ahead.
    Explode,
}

/// Ticks since the creature's previous update; at least one.
pub fn elapsed_ticks(last_update: u64, current_tick: u64) -> i32 {
    current_tick.saturating_sub(last_update).clamp(1, i32::MAX as u64) as i32
}

fn push_animation(frame: &CreatureFrame, outcome: AttackOutcome, events: &mut Vec<SimEvent>) {
    if let Some(event) = outcome.animation() {
        events.push(SimEvent::CreatureAnimation {
            id: frame.id,
            event,
        });
    }
}

/// Run one update of `frame`, appending host-facing events to `events`.
pub fn update_creature(
    frame: &mut CreatureFrame,
    ctx: &UpdateContext,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) -> UpdateOutcome {
    let tick = elapsed_ticks(frame.last_update, ctx.current_tick);
    frame.last_update = ctx.current_tick;

    if !frame.is_alive() {
        frame.vitals.dead_ticks += tick;
        if frame.vitals.dead_ticks >= DEATH_TICKS {
            return UpdateOutcome::Remove(RemovalReason::Died);
        }
        return UpdateOutcome::Updated;
    }

    frame.combat.attack_delay = frame.combat.attack_delay.saturating_add(tick);
    if frame.combat.angry_ticks > 0 {
        frame.combat.angry_ticks = (frame.combat.angry_ticks - tick).max(0);
    }

    let mut outcome = UpdateOutcome::Updated;
    if !combat::knock_back_check(frame, tick, &ctx.env) {
        frame.brain.move_time += tick;
        if frame.brain.movement_enabled {
            outcome = follow_goal(frame, ctx, tick, rng, events);
        }
    }

    for hit in combat::environment_tick(frame, tick, &ctx.env, rng) {
        push_animation(frame, hit, events);
    }

    let body = &mut frame.body;
    if body.position != body.last_position {
        body.last_position = body.position;
        events.push(SimEvent::CreatureMoved {
            id: frame.id,
            position: body.position,
            yaw: body.yaw,
            pitch: body.pitch,
            on_ground: body.on_ground,
        });
    }
    outcome
}

fn follow_goal(
    frame: &mut CreatureFrame,
    ctx: &UpdateContext,
    tick: i32,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) -> UpdateOutcome {
    let goal = targeting::select_goal(frame, ctx.env.players, rng);
    let start = frame.body.position;

    if let Some(fall) = movement::walk_toward(frame, goal.position(), tick, &ctx.env) {
        let damage = combat::fall_damage(fall);
        if damage > 0.0 {
            let hit = combat::attack(frame, &mut DamageEvent::new(DamageCause::Fall, damage));
            push_animation(frame, hit, events);
        }
    }

    let here = frame.body.position;
    match goal {
        Goal::Player {
            runtime_id,
            position,
        } => {
            let dist_sq = here.distance_squared(&position);
            if frame.traits().explodes {
                if dist_sq <= FUSE_RANGE_SQ {
                    frame.combat.fuse_ticks += tick;
                    if frame.combat.fuse_ticks >= FUSE_TICKS {
                        return UpdateOutcome::Explode;
                    }
                } else {
                    frame.combat.fuse_ticks = 0;
                }
            } else if frame.combat.attack_delay >= MELEE_COOLDOWN && dist_sq <= MELEE_RANGE_SQ {
                frame.combat.attack_delay = 0;
                let damage = frame.damage.0[ctx.difficulty.index()];
                if damage > 0.0 {
                    events.push(SimEvent::CreatureAttackPlayer {
                        id: frame.id,
                        player: runtime_id,
                        damage,
                    });
                }
            }
        }
        Goal::Point(point) => {
            frame.combat.fuse_ticks = 0;
            if here.distance(&point) <= 1.0 {
                frame.brain.move_time = WANDER_EXPIRED;
            } else if here.x == start.x || here.z == start.z {
                frame.brain.move_time += STUCK_PENALTY;
            }
        }
    }
    UpdateOutcome::Updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::EntityEvent;
    use crate::components::{Body, CreatureId};
    use crate::host::PlayerSnapshot;
    use crate::species::Species;
    use mc_mobs_world::{Vec3, VoxelWorld};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn creature(species: Species, x: f32, z: f32) -> CreatureFrame {
        let t = species.traits();
        let mut body = Body::new(Vec3::new(x, 4.0, z), 0.0, 0.0, t.width, t.height);
        body.on_ground = true;
        CreatureFrame::spawn(CreatureId(1), species, "world", body, 0)
    }

    /// Every range roll lands on its midpoint, so a wanderer never starts
    /// loitering (1..=420 gives 211) and a fresh wander goal never expires.
    fn midpoint_rng() -> StepRng {
        StepRng::new(1 << 31, 0)
    }

    fn ctx<'a>(world: &'a VoxelWorld, players: &'a [PlayerSnapshot], tick: u64) -> UpdateContext<'a> {
        UpdateContext {
            current_tick: tick,
            difficulty: Difficulty::Normal,
            env: Surroundings {
                view: world,
                players,
                neighbors: &[],
            },
        }
    }

    #[test]
    fn elapsed_is_at_least_one() {
        assert_eq!(elapsed_ticks(10, 10), 1);
        assert_eq!(elapsed_ticks(10, 9), 1);
        assert_eq!(elapsed_ticks(10, 15), 5);
    }

    #[test]
    fn zombie_melee_uses_difficulty_damage() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(1.0, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Zombie, 0.5, 0.5);
        frame.combat.attack_delay = MELEE_COOLDOWN;
        let mut events = Vec::new();

        let outcome = update_creature(&mut frame, &ctx(&world, &players, 1), &mut rng, &mut events);
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert!(events.contains(&SimEvent::CreatureAttackPlayer {
            id: CreatureId(1),
            player: 9,
            damage: 4.0,
        }));
        assert_eq!(frame.combat.attack_delay, 0);
    }

    #[test]
    fn melee_respects_cooldown() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(1.0, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Zombie, 0.5, 0.5);
        frame.combat.attack_delay = 0;
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &players, 1), &mut rng, &mut events);
        assert!(!events
            .iter()
            .any(|e| matches!(e, SimEvent::CreatureAttackPlayer { .. })));
        assert_eq!(frame.combat.attack_delay, 1);
    }

    #[test]
    fn creeper_fuse_burns_then_explodes() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(2.5, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Creeper, 0.5, 0.5);
        let mut events = Vec::new();

        let outcome = update_creature(&mut frame, &ctx(&world, &players, 20), &mut rng, &mut events);
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(frame.combat.fuse_ticks, 20);

        let outcome = update_creature(&mut frame, &ctx(&world, &players, 30), &mut rng, &mut events);
        assert_eq!(outcome, UpdateOutcome::Explode);
    }

    #[test]
    fn creeper_fuse_resets_out_of_range() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(8.5, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Creeper, 0.5, 0.5);
        frame.combat.fuse_ticks = 25;
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &players, 1), &mut rng, &mut events);
        assert_eq!(frame.combat.fuse_ticks, 0);
    }

    #[test]
    fn dying_creature_is_removed_after_death_ticks() {
        let world = VoxelWorld::flat("world", 3, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Cow, 0.5, 0.5);
        frame.vitals.health = 0.0;
        let mut events = Vec::new();

        let mut removed_at = None;
        for tick in 1..=40u64 {
            let outcome = update_creature(&mut frame, &ctx(&world, &[], tick), &mut rng, &mut events);
            if outcome == UpdateOutcome::Remove(RemovalReason::Died) {
                removed_at = Some(tick);
                break;
            }
        }
        assert_eq!(removed_at, Some(25));
        assert!(events.is_empty());
        assert_eq!(frame.body.position, Vec3::new(0.5, 4.0, 0.5));
    }

    #[test]
    fn disabled_creature_never_moves() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(3.5, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Zombie, 0.5, 0.5);
        frame.brain.movement_enabled = false;
        let mut events = Vec::new();
        for tick in 1..=50u64 {
            update_creature(&mut frame, &ctx(&world, &players, tick), &mut rng, &mut events);
        }
        assert_eq!(frame.body.position, Vec3::new(0.5, 4.0, 0.5));
        assert!(events.is_empty());
        assert!(frame.brain.wander_goal.is_none());
    }

    #[test]
    fn chasing_zombie_moves_and_reports_it() {
        let world = VoxelWorld::flat("world", 3, 1);
        let players = vec![PlayerSnapshot::new(9, "Steve", "world", Vec3::new(6.5, 4.0, 0.5))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut frame = creature(Species::Zombie, 0.5, 0.5);
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &players, 1), &mut rng, &mut events);
        assert!((frame.body.position.x - 0.61).abs() < 1e-4);
        assert_eq!(frame.body.last_position, frame.body.position);
        assert!(matches!(
            events.as_slice(),
            [SimEvent::CreatureMoved { id: CreatureId(1), on_ground: false, .. }]
        ));
    }

    #[test]
    fn reaching_the_wander_point_expires_it() {
        let world = VoxelWorld::flat("world", 3, 1);
        let mut rng = midpoint_rng();
        let mut frame = creature(Species::Cow, 0.5, 0.5);
        frame.brain.wander_goal = Some(Vec3::new(0.9, 4.0, 0.5));
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &[], 1), &mut rng, &mut events);
        assert_eq!(frame.brain.stay_time, 0);
        assert_eq!(frame.brain.move_time, WANDER_EXPIRED);
    }

    #[test]
    fn blocked_wanderer_gets_stuck_penalty() {
        let mut world = VoxelWorld::flat("world", 3, 1);
        for y in 4..=6 {
            world.set_block(mc_mobs_world::BlockPos::new(1, y, 0), mc_mobs_world::BlockKind::Solid);
        }
        let mut rng = midpoint_rng();
        let mut frame = creature(Species::Zombie, 0.5, 0.5);
        frame.brain.wander_goal = Some(Vec3::new(50.0, 4.0, 0.5));
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &[], 1), &mut rng, &mut events);
        assert_eq!(frame.brain.stay_time, 0);
        // Clipped by the wall on x and no progress at all on z.
        assert_eq!(frame.brain.move_time, 1 + STUCK_PENALTY);
    }

    #[test]
    fn fall_damage_on_landing() {
        let world = VoxelWorld::flat("world", 3, 1);
        let mut rng = midpoint_rng();
        let mut frame = creature(Species::Cow, 0.5, 0.5);
        frame.body.on_ground = false;
        frame.body.fall_distance = 5.0;
        frame.body.position.y = 4.05;
        frame.brain.wander_goal = Some(Vec3::new(0.5, 4.0, 30.0));
        let mut events = Vec::new();
        update_creature(&mut frame, &ctx(&world, &[], 1), &mut rng, &mut events);
        assert_eq!(frame.brain.stay_time, 0);
        assert_eq!(frame.vitals.health, 8.0);
        assert!(events.contains(&SimEvent::CreatureAnimation {
            id: CreatureId(1),
            event: EntityEvent::Hurt,
        }));
    }
}
