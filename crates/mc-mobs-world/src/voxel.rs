//! In-memory block world.
//!
//! A flat world is bedrock at Y = 0 with filler up to the floor layer; the
//! top of the floor is at `floor_y + 1`. Only cells that differ from the
//! generated layout are stored.

use std::collections::{HashMap, HashSet};

use crate::block::BlockKind;
use crate::types::{BlockPos, ChunkPos};
use crate::view::WorldView;

#[derive(Debug, Clone)]
pub struct VoxelWorld {
    name: String,
    floor_y: Option<i32>,
    generated: HashSet<ChunkPos>,
    overrides: HashMap<BlockPos, BlockKind>,
}

impl VoxelWorld {
    /// Empty world with no generated chunks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floor_y: None,
            generated: HashSet::new(),
            overrides: HashMap::new(),
        }
    }

    /// Flat world with every chunk within `radius_chunks` of the origin generated.
    pub fn flat(name: impl Into<String>, floor_y: i32, radius_chunks: i32) -> Self {
        let mut world = Self::new(name);
        world.floor_y = Some(floor_y);
        for x in -radius_chunks..=radius_chunks {
            for z in -radius_chunks..=radius_chunks {
                world.generate_chunk(ChunkPos::new(x, z));
            }
        }
        world
    }

    pub fn generate_chunk(&mut self, chunk: ChunkPos) {
        self.generated.insert(chunk);
    }

    pub fn generated_chunks(&self) -> usize {
        self.generated.len()
    }

    /// Y of the topmost floor layer, if this is a flat world.
    pub fn floor_y(&self) -> Option<i32> {
        self.floor_y
    }

    pub fn set_block(&mut self, pos: BlockPos, kind: BlockKind) {
        self.overrides.insert(pos, kind);
    }

    /// Drop a placed block, reverting the cell to its generated layout.
    pub fn reset_block(&mut self, pos: BlockPos) {
        self.overrides.remove(&pos);
    }

    fn generated_block(&self, pos: BlockPos) -> BlockKind {
        match self.floor_y {
            Some(floor) if pos.y >= 0 && pos.y <= floor => BlockKind::Solid,
            _ => BlockKind::Air,
        }
    }
}

impl WorldView for VoxelWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn block(&self, pos: BlockPos) -> BlockKind {
        if !self.generated.contains(&pos.chunk_pos()) {
            return BlockKind::Air;
        }
        self.overrides
            .get(&pos)
            .copied()
            .unwrap_or_else(|| self.generated_block(pos))
    }

    fn is_chunk_generated(&self, chunk: ChunkPos) -> bool {
        self.generated.contains(&chunk)
    }
}
