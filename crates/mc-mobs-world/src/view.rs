//! Read-only world access used by the simulation.

use crate::block::BlockKind;
use crate::physics::Aabb;
use crate::types::{BlockPos, ChunkPos};

/// Block and chunk queries a host world must answer.
///
/// Implemented by [`crate::VoxelWorld`] for the bundled server and tests;
/// a real server wires its own chunk storage in here.
pub trait WorldView {
    /// Name used to address this world in commands and placements.
    fn name(&self) -> &str;

    /// Kind of block at the cell. Cells outside loaded chunks read as air.
    fn block(&self, pos: BlockPos) -> BlockKind;

    fn is_chunk_generated(&self, chunk: ChunkPos) -> bool;

    fn bounding_box(&self, pos: BlockPos) -> Option<Aabb> {
        self.block(pos).bounding_box(pos)
    }
}
