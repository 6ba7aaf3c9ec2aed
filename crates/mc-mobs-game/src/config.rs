//! Governor settings, read from `entity-data.toml`.

use serde::{Deserialize, Serialize};

/// What creature explosions are allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ExplodeValue", into = "ExplodeValue")]
pub enum ExplosionMode {
    /// Explosions are cancelled.
    Disabled,
    /// Explosions hurt entities and break blocks.
    #[default]
    Full,
    /// Explosions hurt entities but leave blocks alone.
    EntityOnly,
}

/// On-disk form: `explode = true | false | "entity"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ExplodeValue {
    Flag(bool),
    Keyword(String),
}

impl TryFrom<ExplodeValue> for ExplosionMode {
    type Error = String;

    fn try_from(value: ExplodeValue) -> Result<Self, Self::Error> {
        match value {
            ExplodeValue::Flag(true) => Ok(ExplosionMode::Full),
            ExplodeValue::Flag(false) => Ok(ExplosionMode::Disabled),
            ExplodeValue::Keyword(k) if k.eq_ignore_ascii_case("entity") => {
                Ok(ExplosionMode::EntityOnly)
            }
            ExplodeValue::Keyword(k) => Err(format!(
                "invalid explode mode {k:?}, expected true, false or \"entity\""
            )),
        }
    }
}

impl From<ExplosionMode> for ExplodeValue {
    fn from(mode: ExplosionMode) -> Self {
        match mode {
            ExplosionMode::Full => ExplodeValue::Flag(true),
            ExplosionMode::Disabled => ExplodeValue::Flag(false),
            ExplosionMode::EntityOnly => ExplodeValue::Keyword("entity".into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernorConfig {
    #[serde(default)]
    pub explode: ExplosionMode,
    #[serde(default)]
    pub entity: EntitySection,
    #[serde(default)]
    pub spawn: SpawnSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySection {
    /// Spawn creatures around online players.
    #[serde(default = "default_true")]
    pub autospawn: bool,
    /// Population cap across all worlds.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSection {
    /// Monsters may be admitted.
    #[serde(default = "default_true")]
    pub mob: bool,
    /// Animals may be admitted.
    #[serde(default = "default_true")]
    pub animal: bool,
    /// Ticks between spawn attempts.
    #[serde(default = "default_spawn_tick")]
    pub tick: u32,
    /// Search radius around players, in blocks.
    #[serde(default = "default_spawn_radius")]
    pub radius: i32,
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u32 {
    60
}

fn default_spawn_tick() -> u32 {
    50
}

fn default_spawn_radius() -> i32 {
    25
}

impl Default for EntitySection {
    fn default() -> Self {
        Self {
            autospawn: true,
            limit: default_limit(),
        }
    }
}

impl Default for SpawnSection {
    fn default() -> Self {
        Self {
            mob: true,
            animal: true,
            tick: default_spawn_tick(),
            radius: default_spawn_radius(),
        }
    }
}

impl GovernorConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Look up a dotted key such as `"spawn.tick"`.
    ///
    /// Returns `None` when any segment is missing; callers treat that as
    /// the feature being disabled.
    pub fn get(&self, key: &str) -> Option<toml::Value> {
        let mut value = toml::Value::try_from(self).ok()?;
        for segment in key.split('.') {
            value = match value {
                toml::Value::Table(mut table) => table.remove(segment)?,
                _ => return None,
            };
        }
        Some(value)
    }
}
