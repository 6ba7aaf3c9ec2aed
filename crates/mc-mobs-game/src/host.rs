//! What the simulation needs from the server it runs inside.

use mc_mobs_world::{Aabb, BlockPos, ChunkPos, Vec3, VoxelWorld, WorldView};
use mc_mobs_world::physics::{PLAYER_HEIGHT, PLAYER_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    /// Modes in which creatures may hunt and hurt the player.
    pub fn is_damageable(self) -> bool {
        matches!(self, GameMode::Survival | GameMode::Adventure)
    }
}

/// Server difficulty, used to index melee damage tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Peaceful,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn index(self) -> usize {
        match self {
            Difficulty::Peaceful => 0,
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Parse a name (`"normal"`) or level (`"2"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peaceful" | "0" => Some(Difficulty::Peaceful),
            "easy" | "1" => Some(Difficulty::Easy),
            "normal" | "2" => Some(Difficulty::Normal),
            "hard" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Read-only view of an online player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub runtime_id: u64,
    pub name: String,
    pub world: String,
    /// Feet position.
    pub position: Vec3,
    pub spawned: bool,
    pub alive: bool,
    /// Connection is closing or closed.
    pub closed: bool,
    pub game_mode: GameMode,
    pub view_radius_chunks: i32,
}

impl PlayerSnapshot {
    pub fn new(runtime_id: u64, name: impl Into<String>, world: impl Into<String>, position: Vec3) -> Self {
        Self {
            runtime_id,
            name: name.into(),
            world: world.into(),
            position,
            spawned: true,
            alive: true,
            closed: false,
            game_mode: GameMode::Survival,
            view_radius_chunks: 8,
        }
    }

    /// Whether the player has the chunk containing `position` loaded.
    pub fn observes(&self, world: &str, position: Vec3) -> bool {
        self.world == world
            && self.position.block_pos().chunk_pos().distance(&position.block_pos().chunk_pos())
                <= self.view_radius_chunks
    }

    /// Present in the world as a physical body.
    pub fn is_present(&self) -> bool {
        self.spawned && self.alive && !self.closed
    }

    /// A valid chase target.
    pub fn is_huntable(&self) -> bool {
        self.is_present() && self.game_mode.is_damageable()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_feet(self.position, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

/// Services the host server provides to the simulation.
pub trait Host {
    fn world(&self, name: &str) -> Option<&dyn WorldView>;

    /// World used when no world is named.
    fn default_world(&self) -> &str;

    fn online_players(&self) -> &[PlayerSnapshot];

    /// Percentage of the tick budget used by the last tick (0..=100).
    fn tick_usage(&self) -> f32;

    fn difficulty(&self) -> Difficulty;

    fn player(&self, runtime_id: u64) -> Option<&PlayerSnapshot> {
        self.online_players()
            .iter()
            .find(|p| p.runtime_id == runtime_id)
    }

    fn is_chunk_generated(&self, world: &str, chunk: ChunkPos) -> bool {
        self.world(world)
            .is_some_and(|w| w.is_chunk_generated(chunk))
    }
}

/// Host backed by in-memory voxel worlds.
#[derive(Debug, Clone)]
pub struct LocalHost {
    pub worlds: Vec<VoxelWorld>,
    pub players: Vec<PlayerSnapshot>,
    pub tick_usage: f32,
    pub difficulty: Difficulty,
}

impl LocalHost {
    /// Host with a single default world.
    pub fn new(world: VoxelWorld) -> Self {
        Self {
            worlds: vec![world],
            players: Vec::new(),
            tick_usage: 0.0,
            difficulty: Difficulty::Normal,
        }
    }

    pub fn add_world(&mut self, world: VoxelWorld) {
        self.worlds.push(world);
    }

    pub fn world_mut(&mut self, name: &str) -> Option<&mut VoxelWorld> {
        self.worlds.iter_mut().find(|w| w.name() == name)
    }

    pub fn add_player(&mut self, player: PlayerSnapshot) {
        self.players.push(player);
    }

    /// Set a block in the named world. Returns `false` for unknown worlds.
    pub fn set_block(&mut self, world: &str, pos: BlockPos, kind: mc_mobs_world::BlockKind) -> bool {
        match self.world_mut(world) {
            Some(w) => {
                w.set_block(pos, kind);
                true
            }
            None => false,
        }
    }
}

impl Host for LocalHost {
    fn world(&self, name: &str) -> Option<&dyn WorldView> {
        self.worlds
            .iter()
            .find(|w| w.name() == name)
            .map(|w| w as &dyn WorldView)
    }

    fn default_world(&self) -> &str {
        self.worlds.first().map(|w| w.name()).unwrap_or("world")
    }

    fn online_players(&self) -> &[PlayerSnapshot] {
        &self.players
    }

    fn tick_usage(&self) -> f32 {
        self.tick_usage
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
