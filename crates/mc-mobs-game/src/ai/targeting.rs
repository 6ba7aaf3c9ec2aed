//! Per-update movement goal: wander, loiter or chase.

use mc_mobs_world::Vec3;
use rand::Rng;

use crate::frame::CreatureFrame;
use crate::host::PlayerSnapshot;

/// Players further away than this (squared) are never chased.
pub const CHASE_RANGE_SQ: f32 = 81.0;

/// Wander goals expire after a roll in this range.
pub const WANDER_TIMEOUT_MIN: i32 = 650;
pub const WANDER_TIMEOUT_MAX: i32 = 800;

/// Where a creature is heading this update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    Player { runtime_id: u64, position: Vec3 },
    Point(Vec3),
}

impl Goal {
    pub fn position(&self) -> Vec3 {
        match *self {
            Goal::Player { position, .. } => position,
            Goal::Point(point) => point,
        }
    }
}

fn offset(rng: &mut impl Rng, origin: Vec3, xz: i32, y: i32) -> Vec3 {
    origin.add_xyz(
        rng.gen_range(-xz..=xz) as f32,
        rng.gen_range(-y..=y) as f32,
        rng.gen_range(-xz..=xz) as f32,
    )
}

/// The closest huntable player within chase range that can see the creature.
///
/// Ties keep the first player found.
pub fn nearest_huntable<'a>(
    frame: &CreatureFrame,
    players: &'a [PlayerSnapshot],
) -> Option<&'a PlayerSnapshot> {
    let here = frame.body.position;
    let mut best: Option<(&PlayerSnapshot, f32)> = None;
    for player in players {
        if !player.observes(&frame.world, here) || !player.is_huntable() {
            continue;
        }
        let dist_sq = here.distance_squared(&player.position);
        if dist_sq > CHASE_RANGE_SQ {
            continue;
        }
        if best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((player, dist_sq));
        }
    }
    best.map(|(player, _)| player)
}

/// Pick this update's goal, rolling new loiter or wander points as needed.
pub fn select_goal(
    frame: &mut CreatureFrame,
    players: &[PlayerSnapshot],
    rng: &mut impl Rng,
) -> Goal {
    if !frame.brain.movement_enabled {
        return Goal::Point(Vec3::ZERO);
    }
    let here = frame.body.position;

    if frame.brain.stay_time > 0 {
        let reroll = match frame.brain.stay_point {
            None => true,
            Some(_) => rng.gen_range(1..=115) <= 3 && frame.brain.stay_time % 20 == 0,
        };
        if reroll {
            frame.brain.stay_point = Some(offset(rng, here, 10, 3));
        }
        return Goal::Point(frame.brain.stay_point.unwrap_or(here));
    }

    let target = nearest_huntable(frame, players);
    let hostile = frame.is_hostile_now();

    if (target.is_none() || !hostile)
        && frame.brain.stay_time <= 0
        && rng.gen_range(1..=420) == 1
    {
        frame.brain.stay_time = rng.gen_range(100..=450);
        let anchor = offset(rng, here, 10, 3);
        frame.brain.stay_point = Some(anchor);
        return Goal::Point(anchor);
    }

    if let Some(player) = target.filter(|_| hostile) {
        return Goal::Player {
            runtime_id: player.runtime_id,
            position: player.position,
        };
    }

    let expired = frame.brain.move_time >= rng.gen_range(WANDER_TIMEOUT_MIN..=WANDER_TIMEOUT_MAX);
    let goal = match frame.brain.wander_goal {
        Some(goal) if !expired => goal,
        _ => {
            frame.brain.move_time = 0;
            let goal = offset(rng, here, 100, 0);
            frame.brain.wander_goal = Some(goal);
            goal
        }
    };
    Goal::Point(goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Body, CreatureId};
    use crate::host::GameMode;
    use crate::species::Species;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn creature(species: Species) -> CreatureFrame {
        let t = species.traits();
        let body = Body::new(Vec3::new(0.5, 4.0, 0.5), 0.0, 0.0, t.width, t.height);
        CreatureFrame::spawn(CreatureId(1), species, "world", body, 0)
    }

    fn player(id: u64, x: f32, z: f32) -> PlayerSnapshot {
        PlayerSnapshot::new(id, format!("p{id}"), "world", Vec3::new(x, 4.0, z))
    }

    #[test]
    fn disabled_movement_targets_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut frame = creature(Species::Zombie);
        frame.brain.movement_enabled = false;
        let before = frame.brain;
        let players = vec![player(1, 2.0, 0.5)];
        for _ in 0..50 {
            assert_eq!(select_goal(&mut frame, &players, &mut rng), Goal::Point(Vec3::ZERO));
        }
        assert_eq!(frame.brain, before);
    }

    #[test]
    fn zombie_chases_nearest_player() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut frame = creature(Species::Zombie);
        let players = vec![player(1, 6.0, 0.5), player(2, 3.0, 0.5), player(3, 20.0, 0.5)];
        let goal = select_goal(&mut frame, &players, &mut rng);
        assert_eq!(
            goal,
            Goal::Player {
                runtime_id: 2,
                position: Vec3::new(3.0, 4.0, 0.5)
            }
        );
    }

    #[test]
    fn ties_keep_first_player() {
        let frame = creature(Species::Zombie);
        let players = vec![player(4, 3.5, 0.5), player(5, -2.5, 0.5)];
        assert_eq!(nearest_huntable(&frame, &players).map(|p| p.runtime_id), Some(4));
    }

    #[test]
    fn unhuntable_players_are_skipped() {
        let frame = creature(Species::Zombie);
        let mut creative = player(1, 1.5, 0.5);
        creative.game_mode = GameMode::Creative;
        let mut dead = player(2, 1.5, 0.5);
        dead.alive = false;
        let mut closed = player(3, 1.5, 0.5);
        closed.closed = true;
        let far = player(4, 10.0, 0.5);
        let mut elsewhere = player(5, 1.5, 0.5);
        elsewhere.world = "nether".into();
        let players = vec![creative, dead, closed, far, elsewhere];
        assert!(nearest_huntable(&frame, &players).is_none());
    }

    #[test]
    fn chase_range_is_inclusive() {
        let frame = creature(Species::Zombie);
        // Exactly 9 blocks away.
        let players = vec![player(1, 9.5, 0.5)];
        assert!(nearest_huntable(&frame, &players).is_some());
    }

    #[test]
    fn pig_zombie_only_chases_when_angry() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut frame = creature(Species::PigZombie);
        let players = vec![player(1, 2.0, 0.5)];
        assert!(matches!(select_goal(&mut frame, &players, &mut rng), Goal::Point(_)));

        frame.brain.stay_time = 0;
        frame.brain.stay_point = None;
        frame.combat.angry_ticks = 200;
        assert!(matches!(
            select_goal(&mut frame, &players, &mut rng),
            Goal::Player { runtime_id: 1, .. }
        ));
    }

    #[test]
    fn loitering_rolls_an_anchor_nearby() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut frame = creature(Species::Cow);
        frame.brain.stay_time = 30;
        let goal = select_goal(&mut frame, &[], &mut rng);
        let anchor = frame.brain.stay_point.expect("anchor rolled");
        assert_eq!(goal, Goal::Point(anchor));
        let d = anchor - frame.body.position;
        assert!(d.x.abs() <= 10.0 && d.y.abs() <= 3.0 && d.z.abs() <= 10.0);
        assert_eq!(d.x.fract(), 0.0);
    }

    #[test]
    fn loitering_keeps_anchor_off_the_twenty_tick_mark() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut frame = creature(Species::Cow);
        let anchor = Vec3::new(3.0, 4.0, 3.0);
        frame.brain.stay_time = 33;
        frame.brain.stay_point = Some(anchor);
        for _ in 0..100 {
            assert_eq!(select_goal(&mut frame, &[], &mut rng), Goal::Point(anchor));
        }
    }

    #[test]
    fn wander_goal_is_picked_and_kept() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut frame = creature(Species::Sheep);
        frame.brain.move_time = 40;
        let first = select_goal(&mut frame, &[], &mut rng);
        // Seed 9 does not roll loitering on either call.
        assert_eq!(frame.brain.stay_time, 0);
        let wander = frame.brain.wander_goal.expect("wander goal");
        assert_eq!(first, Goal::Point(wander));
        assert_eq!(frame.brain.move_time, 0);
        let d = wander - frame.body.position;
        assert!(d.x.abs() <= 100.0 && d.z.abs() <= 100.0);
        assert_eq!(d.y, 0.0);

        frame.brain.move_time = 100;
        let again = select_goal(&mut frame, &[], &mut rng);
        assert_eq!(frame.brain.stay_time, 0);
        assert_eq!(again, Goal::Point(wander));
        assert_eq!(frame.brain.move_time, 100);
    }

    #[test]
    fn stale_wander_goal_is_replaced() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut frame = creature(Species::Sheep);
        let old = Vec3::new(500.0, 4.0, 500.0);
        frame.brain.wander_goal = Some(old);
        frame.brain.move_time = WANDER_TIMEOUT_MAX;
        select_goal(&mut frame, &[], &mut rng);
        assert_eq!(frame.brain.stay_time, 0);
        assert_ne!(frame.brain.wander_goal, Some(old));
        assert_eq!(frame.brain.move_time, 0);
    }
}
