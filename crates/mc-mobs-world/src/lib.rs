//! World-side types for the creature simulation: coordinates, blocks,
//! collision geometry and the read-only world interface.

pub mod block;
pub mod physics;
pub mod types;
pub mod view;
pub mod voxel;

pub use block::BlockKind;
pub use physics::{resolve_displacement, Aabb, Displacement, Obstacle};
pub use types::{BlockPos, ChunkPos, ParseBlockPosError, Vec3};
pub use view::WorldView;
pub use voxel::VoxelWorld;
