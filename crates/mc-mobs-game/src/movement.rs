//! Creature movement: collision-resolved displacement, gravity and facing.

use mc_mobs_world::physics::{ENTITY_COLLISION_GROW, GRAVITY};
use mc_mobs_world::{resolve_displacement, Aabb, Obstacle, Vec3, WorldView};

use crate::ai::pathfinding;
use crate::components::{Body, CreatureId};
use crate::frame::CreatureFrame;
use crate::host::PlayerSnapshot;

/// Another creature, as seen by the one being updated.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: CreatureId,
    pub world: String,
    pub position: Vec3,
    pub bb: Aabb,
    pub alive: bool,
}

impl Neighbor {
    pub fn of(frame: &CreatureFrame) -> Self {
        Self {
            id: frame.id,
            world: frame.world.clone(),
            position: frame.body.position,
            bb: frame.body.bounding_box(),
            alive: frame.is_alive(),
        }
    }
}

/// Everything a creature can collide with or look at during its update.
pub struct Surroundings<'a> {
    pub view: &'a dyn WorldView,
    pub players: &'a [PlayerSnapshot],
    pub neighbors: &'a [Neighbor],
}

impl Surroundings<'_> {
    fn obstacles(&self, swept: &Aabb, own_id: CreatureId, world: &str) -> Vec<Obstacle> {
        let mut obstacles: Vec<Obstacle> = swept
            .padding_cells()
            .into_iter()
            .filter_map(|cell| self.view.bounding_box(cell))
            .map(Obstacle::block)
            .collect();

        let reach = swept.grow(
            ENTITY_COLLISION_GROW,
            ENTITY_COLLISION_GROW,
            ENTITY_COLLISION_GROW,
        );
        obstacles.extend(
            self.neighbors
                .iter()
                .filter(|n| n.id != own_id && n.world == world && n.bb.intersects(&reach))
                .map(|n| Obstacle::entity(n.bb)),
        );
        obstacles.extend(
            self.players
                .iter()
                .filter(|p| p.world == world && p.is_present())
                .map(PlayerSnapshot::bounding_box)
                .filter(|bb| bb.intersects(&reach))
                .map(Obstacle::entity),
        );
        obstacles
    }
}

/// Move by `(dx, dz, dy)` against the world and commit the result.
///
/// Returns the fall distance when this move landed the creature.
pub fn move_body(frame: &mut CreatureFrame, dx: f32, dz: f32, dy: f32, env: &Surroundings) -> Option<f32> {
    let bb = frame.body.bounding_box();
    let obstacles = env.obstacles(&bb.swept(dx, dy, dz), frame.id, &frame.world);
    let d = resolve_displacement(&bb, dx, dz, dy, &obstacles);

    let body = &mut frame.body;
    body.position = body.position.add_xyz(d.dx, d.dy, d.dz);
    body.on_ground = d.dy != dy && dy < 0.0;
    let landed = update_fall_state(body, d.dy);
    if body.on_ground {
        body.motion_y = 0.0;
    }

    body.collided_vertically = d.dy != dy;
    body.collided_horizontally = d.dx != dx || d.dz != dz;
    body.collided = body.collided_horizontally || body.collided_vertically;
    landed
}

fn update_fall_state(body: &mut Body, dy: f32) -> Option<f32> {
    if body.on_ground {
        if body.fall_distance > 0.0 {
            return Some(std::mem::take(&mut body.fall_distance));
        }
    } else if dy < 0.0 {
        body.fall_distance -= dy;
    }
    None
}

/// Turn to look at `target`.
pub fn face(body: &mut Body, target: Vec3) {
    body.yaw = pathfinding::yaw_for_heading(pathfinding::heading(body.position, target));
    body.pitch = pathfinding::pitch_toward(body.position, target);
}

/// One goal-seeking step.
///
/// A loitering creature stands still and counts its loiter timer down;
/// otherwise it walks toward `goal` at its species speed with gravity
/// applied while airborne.
pub fn walk_toward(frame: &mut CreatureFrame, goal: Vec3, tick: i32, env: &Surroundings) -> Option<f32> {
    let landed = if frame.brain.stay_time > 0 {
        let landed = move_body(frame, 0.0, 0.0, 0.0, env);
        frame.brain.stay_time -= tick;
        if frame.brain.stay_time <= 0 {
            frame.brain.stay_point = None;
        }
        landed
    } else {
        let ticks = tick as f32;
        if !frame.body.on_ground {
            frame.body.motion_y -= GRAVITY;
        }
        let (dx, dz) = pathfinding::step_along(
            pathfinding::heading(frame.body.position, goal),
            frame.speed() * ticks,
        );
        let dy = frame.body.motion_y * ticks;
        move_body(frame, dx, dz, dy, env)
    };
    face(&mut frame.body, goal);
    landed
}
