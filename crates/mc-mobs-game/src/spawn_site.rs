//! Spawner sites placed by players, persisted in `spawner-data.toml`.

use std::collections::BTreeMap;

use mc_mobs_world::BlockPos;
use serde::{Deserialize, Serialize};

use crate::species::Species;

pub const DEFAULT_SITE_RADIUS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSite {
    #[serde(default = "default_radius")]
    pub radius: i32,
    /// Species names, in the order they were listed.
    #[serde(rename = "mob-list", default)]
    pub mob_list: Vec<String>,
}

fn default_radius() -> i32 {
    DEFAULT_SITE_RADIUS
}

impl SpawnSite {
    /// Site created by placing a spawner: default radius, every species.
    pub fn placed() -> Self {
        Self {
            radius: DEFAULT_SITE_RADIUS,
            mob_list: Species::ALL.iter().map(|s| s.name().to_string()).collect(),
        }
    }
}

/// Spawn sites keyed by block coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnSites(BTreeMap<BlockPos, SpawnSite>);

impl SpawnSites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: BlockPos, site: SpawnSite) -> Option<SpawnSite> {
        self.0.insert(pos, site)
    }

    pub fn remove(&mut self, pos: &BlockPos) -> Option<SpawnSite> {
        self.0.remove(pos)
    }

    pub fn get(&self, pos: &BlockPos) -> Option<&SpawnSite> {
        self.0.get(pos)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockPos, &SpawnSite)> {
        self.0.iter()
    }

    /// Drop every site with an empty species list; returns how many went.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.0.len();
        self.0.retain(|_, site| !site.mob_list.is_empty());
        before - self.0.len()
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
