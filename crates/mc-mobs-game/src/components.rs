//! ECS components carried by every creature.

use bevy_ecs::prelude::*;
use mc_mobs_world::{Aabb, Vec3};

use crate::species::Species;

/// Marker: this entity is a simulated creature.
#[derive(Component, Debug)]
pub struct Creature;

/// Stable identity, assigned at creation and revoked at removal.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(pub u64);

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesTag(pub Species);

/// Name of the world the creature lives in.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct WorldName(pub String);

/// Something that can hit a creature. Never owns the attacker; it is
/// resolved again on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Player(u64),
    Creature(CreatureId),
}

/// Physical state: position, orientation and collision flags.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Feet position.
    pub position: Vec3,
    /// Position at the end of the previous update.
    pub last_position: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub motion_y: f32,
    pub on_ground: bool,
    pub fall_distance: f32,
    pub collided_horizontally: bool,
    pub collided_vertically: bool,
    pub collided: bool,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, width: f32, height: f32) -> Self {
        Self {
            position,
            last_position: position,
            yaw,
            pitch,
            motion_y: 0.0,
            on_ground: false,
            fall_distance: 0.0,
            collided_horizontally: false,
            collided_vertically: false,
            collided: false,
            width,
            height,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_feet(self.position, self.width, self.height)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position.add_xyz(0.0, self.height * 0.9, 0.0)
    }
}

/// Health, hit-invulnerability and breath.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Remaining hit-invulnerability window in ticks.
    pub invulnerable_ticks: i32,
    /// Damage of the last accepted hit.
    pub last_damage: f32,
    pub air_ticks: i32,
    /// Ticks spent dying.
    pub dead_ticks: i32,
}

pub const MAX_AIR_TICKS: i32 = 300;

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            invulnerable_ticks: 0,
            last_damage: 0.0,
            air_ticks: MAX_AIR_TICKS,
            dead_ticks: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Movement goal state.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Brain {
    pub movement_enabled: bool,
    /// Loiter anchor.
    pub stay_point: Option<Vec3>,
    /// Remaining loiter ticks.
    pub stay_time: i32,
    pub wander_goal: Option<Vec3>,
    /// Ticks on the current wander goal; doubles as the knockback window.
    pub move_time: i32,
}

impl Default for Brain {
    fn default() -> Self {
        Self {
            movement_enabled: true,
            stay_point: None,
            stay_time: 0,
            wander_goal: None,
            move_time: 0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatState {
    /// At most one latched attacker.
    pub attacker: Option<EntityRef>,
    /// Ticks since the last melee hit.
    pub attack_delay: i32,
    pub angry_ticks: i32,
    pub fuse_ticks: i32,
}

impl CombatState {
    pub fn is_angry(&self) -> bool {
        self.angry_ticks > 0
    }
}

/// Melee damage per difficulty level.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DamageTable(pub [f32; 4]);

/// Simulation tick of the creature's last update.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastUpdateTick(pub u64);
