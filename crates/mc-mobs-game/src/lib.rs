//! Creature simulation: movement, targeting, combat and the population
//! governor, built on a bevy_ecs world.

pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod frame;
pub mod hooks;
pub mod host;
pub mod movement;
pub mod persistence;
pub mod simulation;
pub mod spawn_site;
pub mod species;

pub use config::{ExplosionMode, GovernorConfig};
pub use error::{PersistError, PlacementError, SpawnError, VetoReason};
pub use host::{Difficulty, GameMode, Host, LocalHost, PlayerSnapshot};
pub use simulation::{CreatureSnapshot, Placement, RemovalReason, SimEvent, Simulation};
pub use spawn_site::{SpawnSite, SpawnSites};
pub use species::{Category, Species};
