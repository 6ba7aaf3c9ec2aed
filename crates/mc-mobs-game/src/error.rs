//! Creature creation and persistence errors.

use std::path::PathBuf;

use mc_mobs_world::{BlockPos, ChunkPos};
use thiserror::Error;

use crate::species::Category;

/// Why a creature could not be created. All variants are non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("creature limit of {limit} reached")]
    CapacityExceeded { limit: u32 },

    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),

    #[error("spawn vetoed: {0}")]
    PolicyVeto(#[from] VetoReason),

    #[error("spawn point {0} is obstructed")]
    Obstructed(BlockPos),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("unknown world {0:?}")]
    UnknownWorld(String),

    #[error("chunk {0} is not generated")]
    ChunkNotGenerated(ChunkPos),

    #[error("unknown creature {0:?}")]
    UnknownSpecies(String),
}

/// Admission refusals raised after a creature was constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VetoReason {
    #[error("{0} spawning is disabled")]
    CategoryDisabled(Category),

    #[error("creature limit reached")]
    LimitReached,
}

/// Failure to read or write one of the governor documents.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize {name}: {source}")]
    Serialize {
        name: &'static str,
        #[source]
        source: toml::ser::Error,
    },
}
