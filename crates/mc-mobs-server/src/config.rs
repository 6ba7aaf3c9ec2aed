use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// `peaceful`, `easy`, `normal`, `hard` or `0`..`3`.
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Length of one simulation tick in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_difficulty() -> String {
    "normal".into()
}

fn default_tick_rate_ms() -> u64 {
    50
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_world_name")]
    pub name: String,
    /// Directory holding `entity-data.toml` and `spawner-data.toml`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Y of the top floor layer of the flat world.
    #[serde(default = "default_flat_floor_y")]
    pub flat_floor_y: i32,
    /// Chunks generated around the origin, in each direction.
    #[serde(default = "default_generated_radius")]
    pub generated_radius_chunks: i32,
    /// Seed of the simulation RNG.
    #[serde(default)]
    pub seed: u64,
}

fn default_world_name() -> String {
    "world".into()
}

fn default_data_dir() -> String {
    "data".into()
}

fn default_flat_floor_y() -> i32 {
    3
}

fn default_generated_radius() -> i32 {
    8
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            data_dir: default_data_dir(),
            flat_floor_y: default_flat_floor_y(),
            generated_radius_chunks: default_generated_radius(),
            seed: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
