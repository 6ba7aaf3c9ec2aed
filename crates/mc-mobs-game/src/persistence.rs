//! Loading and saving the governor documents.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::GovernorConfig;
use crate::error::PersistError;
use crate::spawn_site::SpawnSites;

pub const ENTITY_DATA_FILE: &str = "entity-data.toml";
pub const SPAWNER_DATA_FILE: &str = "spawner-data.toml";

fn read(path: &Path) -> Result<Option<String>, PersistError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write(path: &Path, text: &str) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)
}

fn parse_err(path: PathBuf) -> impl FnOnce(toml::de::Error) -> PersistError {
    move |source| PersistError::Parse { path, source }
}

/// Load `entity-data.toml` from `dir`, writing the defaults when it is missing.
pub fn load_or_init_config(dir: &Path) -> Result<GovernorConfig, PersistError> {
    let path = dir.join(ENTITY_DATA_FILE);
    match read(&path)? {
        Some(text) => GovernorConfig::from_toml(&text).map_err(parse_err(path)),
        None => {
            let config = GovernorConfig::default();
            save_config(dir, &config)?;
            info!("Wrote default governor config to {}", path.display());
            Ok(config)
        }
    }
}

pub fn save_config(dir: &Path, config: &GovernorConfig) -> Result<(), PersistError> {
    let text = config.to_toml().map_err(|source| PersistError::Serialize {
        name: ENTITY_DATA_FILE,
        source,
    })?;
    write(&dir.join(ENTITY_DATA_FILE), &text)
}

/// Load `spawner-data.toml` from `dir`, creating an empty one when missing.
pub fn load_spawn_sites(dir: &Path) -> Result<SpawnSites, PersistError> {
    let path = dir.join(SPAWNER_DATA_FILE);
    match read(&path)? {
        Some(text) => SpawnSites::from_toml(&text).map_err(parse_err(path)),
        None => {
            let sites = SpawnSites::new();
            save_spawn_sites(dir, &sites)?;
            Ok(sites)
        }
    }
}

/// Write `spawner-data.toml`, keeping the previous file as `spawner-data.toml_old`.
pub fn save_spawn_sites(dir: &Path, sites: &SpawnSites) -> Result<(), PersistError> {
    let path = dir.join(SPAWNER_DATA_FILE);
    if path.exists() {
        let backup = path.with_extension("toml_old");
        std::fs::copy(&path, backup).ok();
    }
    let text = sites.to_toml().map_err(|source| PersistError::Serialize {
        name: SPAWNER_DATA_FILE,
        source,
    })?;
    write(&path, &text)
}
