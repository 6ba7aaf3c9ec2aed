//! Creature AI: goal selection, per-creature updates and spawning.

pub mod pathfinding;
pub mod spawning;
pub mod system;
pub mod targeting;
