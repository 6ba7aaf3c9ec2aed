mod commands;
mod config;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use config::ServerConfig;
use mc_mobs_game::persistence;
use mc_mobs_game::{Difficulty, GovernorConfig, LocalHost, SimEvent, Simulation, SpawnSites};
use mc_mobs_world::VoxelWorld;
use tokio::io::AsyncBufReadExt;
use tracing::{debug, error, info, warn};

fn report(event: &SimEvent) {
    match event {
        SimEvent::CreatureSpawned {
            id,
            species,
            world,
            position,
            ..
        } => debug!("{} {id} spawned in {world} at {position}", species.name()),
        SimEvent::CreatureRemoved { id, reason } => debug!("Creature {id} removed ({reason:?})"),
        SimEvent::CreatureAttackPlayer { id, player, damage } => {
            debug!("Creature {id} hit player {player} for {damage}")
        }
        SimEvent::ExplosionPrimed {
            source,
            world,
            position,
            force,
            block_breaking,
        } => info!(
            "Creature {source} exploded in {world} at {position} (force {force}, blocks: {block_breaking})"
        ),
        SimEvent::CreatureMoved { .. } | SimEvent::CreatureAnimation { .. } => {}
    }
}

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("mc-mobs server v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = PathBuf::from(&config.world.data_dir);
    let governor = persistence::load_or_init_config(&data_dir).unwrap_or_else(|e| {
        warn!("Failed to load governor config: {e}; using defaults");
        GovernorConfig::default()
    });
    let spawn_sites = persistence::load_spawn_sites(&data_dir).unwrap_or_else(|e| {
        warn!("Failed to load spawn sites: {e}; starting with none");
        SpawnSites::new()
    });
    info!(
        "Governor: limit {}, spawn every {} ticks, {} spawn sites",
        governor.entity.limit,
        governor.spawn.tick,
        spawn_sites.len()
    );

    let difficulty = Difficulty::parse(&config.server.difficulty).unwrap_or_else(|| {
        warn!(
            "Unknown difficulty {:?}, using normal",
            config.server.difficulty
        );
        Difficulty::Normal
    });
    info!(
        "World: {} (flat, floor y {}, {} chunk radius, seed {})",
        config.world.name,
        config.world.flat_floor_y,
        config.world.generated_radius_chunks,
        config.world.seed
    );
    let mut host = LocalHost::new(VoxelWorld::flat(
        config.world.name.clone(),
        config.world.flat_floor_y,
        config.world.generated_radius_chunks,
    ));
    host.difficulty = difficulty;
    let mut sim = Simulation::new(governor, spawn_sites, config.world.seed);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let tick_rate = Duration::from_millis(config.server.tick_rate_ms.max(1));
    let mut tick_interval = tokio::time::interval(tick_rate);
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let started = Instant::now();
                sim.tick(&host);
                for event in sim.drain_events() {
                    report(&event);
                }
                let used = started.elapsed().as_secs_f32() / tick_rate.as_secs_f32();
                host.tick_usage = (used * 100.0).min(100.0);
            }
            Some(line) = console_rx.recv() => {
                let result = commands::execute(&mut sim, &host, &line);
                for message in &result.messages {
                    info!("{message}");
                }
                if result.should_stop {
                    break;
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Saving spawn sites before shutdown...");
    match persistence::save_spawn_sites(&data_dir, sim.spawn_sites()) {
        Ok(()) => info!("Saved {} spawn sites", sim.spawn_sites().len()),
        Err(e) => error!("Failed to save spawn sites: {e}"),
    }
    info!("Server shut down.");
}
