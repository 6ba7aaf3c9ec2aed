//! Creature physics constants and swept-AABB collision resolution.

use crate::types::{BlockPos, Vec3};

/// Downward acceleration applied to airborne creatures, per tick.
pub const GRAVITY: f32 = 0.08;

/// Vertical nudge applied when walking into a block exactly one unit tall.
pub const STEP_UP: f32 = 0.3;

/// Inflation applied to the swept volume when looking for nearby entities.
pub const ENTITY_COLLISION_GROW: f32 = 0.25;

/// Slack allowed when deciding whether a box rests against a face, so that
/// rounding in committed positions never makes a wall look already entered.
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Player hitbox width (Bedrock: 0.6 blocks).
pub const PLAYER_WIDTH: f32 = 0.6;

/// Player hitbox height when standing (Bedrock: 1.8 blocks).
pub const PLAYER_HEIGHT: f32 = 1.8;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub max_z: f32,
}

impl Aabb {
    pub fn new(min_x: f32, min_y: f32, min_z: f32, max_x: f32, max_y: f32, max_z: f32) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Box of the given footprint standing with its feet at `pos`.
    pub fn from_feet(pos: Vec3, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self::new(
            pos.x - half,
            pos.y,
            pos.z - half,
            pos.x + half,
            pos.y + height,
            pos.z + half,
        )
    }

    /// Box covering a whole block cell, scaled to `height`.
    pub fn cell(pos: BlockPos, height: f32) -> Self {
        let (x, y, z) = (pos.x as f32, pos.y as f32, pos.z as f32);
        Self::new(x, y, z, x + 1.0, y + height, z + 1.0)
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.min_z + dz,
            self.max_x + dx,
            self.max_y + dy,
            self.max_z + dz,
        )
    }

    pub fn grow(&self, x: f32, y: f32, z: f32) -> Self {
        Self::new(
            self.min_x - x,
            self.min_y - y,
            self.min_z - z,
            self.max_x + x,
            self.max_y + y,
            self.max_z + z,
        )
    }

    /// Union of this box and the same box moved by the displacement.
    pub fn swept(&self, dx: f32, dy: f32, dz: f32) -> Self {
        let moved = self.offset(dx, dy, dz);
        Self::new(
            self.min_x.min(moved.min_x),
            self.min_y.min(moved.min_y),
            self.min_z.min(moved.min_z),
            self.max_x.max(moved.max_x),
            self.max_y.max(moved.max_y),
            self.max_z.max(moved.max_z),
        )
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max_x > other.min_x
            && self.min_x < other.max_x
            && self.max_y > other.min_y
            && self.min_y < other.max_y
            && self.max_z > other.min_z
            && self.min_z < other.max_z
    }

    /// Overlap on X and Z by more than [`CONTACT_EPSILON`]; touching faces
    /// do not count.
    fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.max_x > other.min_x + CONTACT_EPSILON
            && self.min_x < other.max_x - CONTACT_EPSILON
            && self.max_z > other.min_z + CONTACT_EPSILON
            && self.min_z < other.max_z - CONTACT_EPSILON
    }

    /// Block cells worth querying around this (swept) box.
    ///
    /// X and Z run from `floor(min)` to `floor(max) + 1`, Y one cell lower
    /// and one cell higher, so slabs under the feet and ledges at the head
    /// are seen.
    pub fn padding_cells(&self) -> Vec<BlockPos> {
        let min_x = self.min_x.floor() as i32;
        let min_y = self.min_y.floor() as i32 - 1;
        let min_z = self.min_z.floor() as i32;
        let max_x = self.max_x.floor() as i32 + 1;
        let max_y = self.max_y.floor() as i32 + 1;
        let max_z = self.max_z.floor() as i32 + 1;

        let mut cells = Vec::new();
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    cells.push(BlockPos::new(x, y, z));
                }
            }
        }
        cells
    }
}

/// Something a moving box may bump into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub bb: Aabb,
    /// Blocks allow the step-up nudge, entities never do.
    pub is_block: bool,
}

impl Obstacle {
    pub fn block(bb: Aabb) -> Self {
        Self { bb, is_block: true }
    }

    pub fn entity(bb: Aabb) -> Self {
        Self {
            bb,
            is_block: false,
        }
    }
}

/// Displacement after collision resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

/// Clip a requested displacement against the given obstacles.
///
/// Obstacles are visited in order and each one sees the displacement as
/// already clipped by the ones before it. X is clipped first, Z is checked
/// against the box moved along X, and Y against the box moved along both.
/// A component only shrinks when the box sits on the near side of the
/// obstacle (within [`CONTACT_EPSILON`]) and the move would cross into it;
/// boxes that already overlap are left alone so a creature stuck inside
/// geometry can still walk out.
///
/// A block one unit tall that clipped the horizontal move adds a
/// [`STEP_UP`] nudge when no vertical motion was requested and no block
/// sits on top of it.
pub fn resolve_displacement(
    bb: &Aabb,
    mut dx: f32,
    mut dz: f32,
    mut dy: f32,
    obstacles: &[Obstacle],
) -> Displacement {
    let feet = (bb.min_y + CONTACT_EPSILON).floor() as i32;

    for obstacle in obstacles {
        let o = &obstacle.bb;
        let band = o.min_y.floor() as i32 - feet;

        if (0..=2).contains(&band) {
            let (before_dx, before_dz) = (dx, dz);
            if bb.max_z > o.min_z + CONTACT_EPSILON && bb.min_z < o.max_z - CONTACT_EPSILON {
                dx = clip_axis(bb.min_x, bb.max_x, dx, o.min_x, o.max_x);
            }
            let moved = bb.offset(dx, 0.0, 0.0);
            if moved.max_x > o.min_x + CONTACT_EPSILON && moved.min_x < o.max_x - CONTACT_EPSILON {
                dz = clip_axis(bb.min_z, bb.max_z, dz, o.min_z, o.max_z);
            }
            let blocked = dx != before_dx || dz != before_dz;
            if blocked
                && obstacle.is_block
                && o.max_y == (feet + 1) as f32
                && dy == 0.0
                && !has_block_on_top(o, obstacles)
            {
                dy = STEP_UP;
            }
        }

        if bb.offset(dx, 0.0, dz).overlaps_xz(o) {
            dy = clip_axis(bb.min_y, bb.max_y, dy, o.min_y, o.max_y);
        }
    }

    Displacement { dx, dy, dz }
}

/// Shrink a move of `d` along one axis so the span `[min, max]` stops at the
/// face of `[o_min, o_max]` it is approaching.
fn clip_axis(min: f32, max: f32, mut d: f32, o_min: f32, o_max: f32) -> f32 {
    if d > 0.0 && max <= o_min + CONTACT_EPSILON && max + d > o_min {
        d = (o_min - max).min(d);
    }
    if d < 0.0 && min >= o_max - CONTACT_EPSILON && min + d < o_max {
        d = (o_max - min).max(d);
    }
    d
}

fn has_block_on_top(o: &Aabb, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|other| other.is_block && other.bb.min_y == o.max_y && other.bb.overlaps_xz(o))
}
