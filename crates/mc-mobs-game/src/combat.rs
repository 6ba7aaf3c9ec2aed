//! Damage application, attacker latch, knockback and environment damage.

use mc_mobs_world::Vec3;
use rand::Rng;

use crate::ai::pathfinding;
use crate::components::{EntityRef, MAX_AIR_TICKS};
use crate::frame::CreatureFrame;
use crate::movement::{self, Surroundings};
use crate::species::Aggression;

/// Hit-invulnerability window after an accepted hit.
pub const HIT_INVULNERABILITY_TICKS: i32 = 10;

/// Repositioning window set when hit by an entity.
pub const REPOSITION_TICKS: i32 = 100;

/// Angry state length for species that anger.
pub const ANGER_TICKS: i32 = 1000;

/// Knockback never lasts longer than this many ticks.
pub const KNOCKBACK_WINDOW: i32 = 5;

/// Horizontal knockback speed, per tick.
pub const KNOCKBACK_SPEED: f32 = 0.3;

/// Upward knockback speed, per tick, while the window is above [`KNOCKBACK_LIFT_UNTIL`].
pub const KNOCKBACK_LIFT: f32 = 0.6;
pub const KNOCKBACK_LIFT_UNTIL: i32 = 3;

/// Falls shorter than this deal no damage.
pub const SAFE_FALL_DISTANCE: f32 = 3.0;

/// Creatures this far below the world floor take void damage.
pub const VOID_Y: f32 = -16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageCause {
    EntityAttack,
    Suffocation,
    Drowning,
    Fall,
    Fire,
    Lava,
    Void,
    Explosion,
    Custom,
}

impl DamageCause {
    pub fn is_fire(self) -> bool {
        matches!(self, DamageCause::Fire | DamageCause::Lava)
    }
}

/// A damage event on its way to a creature.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub cause: DamageCause,
    pub amount: f32,
    pub damager: Option<EntityRef>,
    cancelled: bool,
}

impl DamageEvent {
    pub fn new(cause: DamageCause, amount: f32) -> Self {
        Self {
            cause,
            amount,
            damager: None,
            cancelled: false,
        }
    }

    /// Damage dealt by another entity.
    pub fn by_entity(damager: EntityRef, cause: DamageCause, amount: f32) -> Self {
        Self {
            damager: Some(damager),
            ..Self::new(cause, amount)
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Animation broadcast to viewers of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityEvent {
    Hurt,
    Death,
}

impl EntityEvent {
    /// Bedrock entity event id.
    pub fn id(self) -> u8 {
        match self {
            EntityEvent::Hurt => 2,
            EntityEvent::Death => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// An attacker is latched; the hit never reached the damage pipeline.
    Ignored,
    Cancelled,
    Applied(EntityEvent),
}

impl AttackOutcome {
    pub fn animation(self) -> Option<EntityEvent> {
        match self {
            AttackOutcome::Applied(event) => Some(event),
            _ => None,
        }
    }
}

/// Generic damage step shared by every creature.
///
/// While the invulnerability window is open a hit only lands when it is
/// stronger than the last accepted one.
pub fn apply_base_damage(frame: &mut CreatureFrame, event: &mut DamageEvent) {
    if event.is_cancelled() || !frame.is_alive() {
        event.cancel();
        return;
    }
    let vitals = &mut frame.vitals;
    if vitals.invulnerable_ticks > 0 && event.amount <= vitals.last_damage {
        event.cancel();
        return;
    }
    vitals.last_damage = event.amount;
    vitals.health = (vitals.health - event.amount).max(0.0);
}

/// Deliver a hit to a creature.
pub fn attack(frame: &mut CreatureFrame, event: &mut DamageEvent) -> AttackOutcome {
    if frame.combat.attacker.is_some() {
        return AttackOutcome::Ignored;
    }
    let traits = frame.traits();
    if traits.fire_immune && event.cause.is_fire() {
        event.cancel();
    }

    apply_base_damage(frame, event);
    if event.is_cancelled() {
        return AttackOutcome::Cancelled;
    }

    frame.vitals.invulnerable_ticks = HIT_INVULNERABILITY_TICKS;
    if let Some(damager) = event.damager {
        frame.brain.stay_time = 0;
        frame.brain.stay_point = None;
        frame.brain.move_time = REPOSITION_TICKS;
        if frame.is_alive() {
            frame.combat.attacker = Some(damager);
        }
        if traits.aggression == Aggression::WhenAngry {
            frame.combat.angry_ticks = ANGER_TICKS;
        }
    }

    if frame.is_alive() {
        AttackOutcome::Applied(EntityEvent::Hurt)
    } else {
        frame.combat.attacker = None;
        AttackOutcome::Applied(EntityEvent::Death)
    }
}

/// Where the latched attacker stands, if it still resolves.
fn attacker_position(target: EntityRef, env: &Surroundings) -> Option<Vec3> {
    match target {
        EntityRef::Player(runtime_id) => env
            .players
            .iter()
            .find(|p| p.runtime_id == runtime_id && p.is_present())
            .map(|p| p.position),
        EntityRef::Creature(id) => env
            .neighbors
            .iter()
            .find(|n| n.id == id && n.alive)
            .map(|n| n.position),
    }
}

/// Knockback step. Returns `true` when it replaced the regular movement step.
///
/// The window is clamped to [`KNOCKBACK_WINDOW`] and shrinks by `tick` every
/// call; the attacker is released once it reaches zero.
pub fn knock_back_check(frame: &mut CreatureFrame, tick: i32, env: &Surroundings) -> bool {
    if !frame.is_alive() {
        return false;
    }
    let Some(attacker) = frame.combat.attacker else {
        return false;
    };
    let Some(from) = attacker_position(attacker, env) else {
        frame.combat.attacker = None;
        return false;
    };

    frame.brain.move_time = frame.brain.move_time.min(KNOCKBACK_WINDOW) - tick;
    let ticks = tick as f32;
    let heading = pathfinding::heading(frame.body.position, from);
    let (dx, dz) = pathfinding::step_along(heading, -KNOCKBACK_SPEED * ticks);
    let dy = if frame.brain.move_time > KNOCKBACK_LIFT_UNTIL {
        KNOCKBACK_LIFT * ticks
    } else {
        0.0
    };
    movement::move_body(frame, dx, dz, dy, env);
    movement::face(&mut frame.body, from);

    if frame.brain.move_time <= 0 {
        frame.combat.attacker = None;
    }
    true
}

/// Damage for landing after a fall of `distance` blocks.
pub fn fall_damage(distance: f32) -> f32 {
    (distance - SAFE_FALL_DISTANCE).ceil().max(0.0)
}

/// Per-update environment checks: void, fire, suffocation, water.
///
/// Returns the outcomes of every hit attempted, in order.
pub fn environment_tick(
    frame: &mut CreatureFrame,
    tick: i32,
    env: &Surroundings,
    rng: &mut impl Rng,
) -> Vec<AttackOutcome> {
    let mut outcomes = Vec::new();
    if !frame.is_alive() {
        return outcomes;
    }
    let mut hit = |frame: &mut CreatureFrame, cause, amount| {
        outcomes.push(attack(frame, &mut DamageEvent::new(cause, amount)));
    };

    if frame.body.position.y < VOID_Y {
        hit(frame, DamageCause::Void, 10.0);
    }

    let feet = env.view.block(frame.body.position.block_pos());
    if feet.is_lava() {
        hit(frame, DamageCause::Lava, 4.0);
    } else if feet.is_fire() {
        hit(frame, DamageCause::Fire, 1.0);
    }

    let eyes = env.view.block(frame.body.eye_position().block_pos());
    if eyes.is_solid() {
        hit(frame, DamageCause::Suffocation, 1.0);
    }

    if frame.traits().water_sensitive {
        if feet.is_water() {
            hit(frame, DamageCause::Drowning, 2.0);
            let jump = Vec3::new(
                rng.gen_range(-20..=20) as f32,
                rng.gen_range(-20..=20) as f32,
                rng.gen_range(-20..=20) as f32,
            );
            frame.body.position = frame.body.position + jump;
        }
    } else if eyes.is_water() {
        frame.vitals.air_ticks -= tick;
        if frame.vitals.air_ticks <= -20 {
            frame.vitals.air_ticks = 0;
            hit(frame, DamageCause::Drowning, 2.0);
        }
    } else {
        frame.vitals.air_ticks = MAX_AIR_TICKS;
    }

    if frame.vitals.invulnerable_ticks > 0 {
        frame.vitals.invulnerable_ticks -= tick;
    }
    outcomes
}
