//! Block kinds known to the creature simulation.

use crate::physics::Aabb;
use crate::types::BlockPos;

/// What occupies a block cell, as far as collision and environment checks care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Air,
    /// Full solid cube (stone, dirt, grass, bedrock, ...).
    Solid,
    /// Bottom-half slab, half a block tall.
    Slab,
    Water,
    Lava,
    /// Fire occupies the cell without a hitbox.
    Fire,
}

impl BlockKind {
    /// Collision box of a block of this kind placed at `pos`.
    pub fn bounding_box(self, pos: BlockPos) -> Option<Aabb> {
        match self {
            BlockKind::Solid => Some(Aabb::cell(pos, 1.0)),
            BlockKind::Slab => Some(Aabb::cell(pos, 0.5)),
            BlockKind::Air | BlockKind::Water | BlockKind::Lava | BlockKind::Fire => None,
        }
    }

    /// True for cells that suffocate a creature whose eyes are inside.
    pub fn is_solid(self) -> bool {
        matches!(self, BlockKind::Solid)
    }

    pub fn is_water(self) -> bool {
        matches!(self, BlockKind::Water)
    }

    pub fn is_lava(self) -> bool {
        matches!(self, BlockKind::Lava)
    }

    pub fn is_fire(self) -> bool {
        matches!(self, BlockKind::Fire)
    }
}
