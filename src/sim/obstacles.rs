//! Obstacle stream
//!
//! Gates spawn at the right edge of the playfield, scroll left at the session
//! speed and retire once fully off-screen. Advancing also reports collisions
//! with the entity and gates the entity has just cleared.

use rand::Rng;

use super::state::{Entity, Obstacle, ObstacleStream};
use crate::consts::*;

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// The entity overlaps a segment of at least one gate
    pub collided: bool,
    /// Gates cleared for the first time
    pub scored: u32,
    /// Gates removed after leaving the playfield
    pub retired: usize,
}

/// Inclusive range of top-segment heights that keep the gap reachable for an
/// entity with the given hit radius. `None` if the gap cannot fit.
pub fn spawn_bounds(collision_radius: f32) -> Option<(i32, i32)> {
    let min_top = (collision_radius + SPAWN_MARGIN).ceil() as i32;
    let max_top = (DESIGN_HEIGHT - OBSTACLE_GAP - collision_radius - SPAWN_MARGIN).floor() as i32;
    (min_top <= max_top).then_some((min_top, max_top))
}

/// Top height that centres the gap; used when no reachable range exists
fn centred_top() -> f32 {
    ((DESIGN_HEIGHT - OBSTACLE_GAP) / 2.0).floor()
}

impl ObstacleStream {
    /// Spawn a gate at the right edge if the stream is empty or the latest
    /// gate has scrolled at least one spacing unit in. Returns true on spawn.
    pub fn maybe_spawn<R: Rng>(&mut self, rng: &mut R, collision_radius: f32) -> bool {
        let due = self.is_empty()
            || self
                .last_spawn_x
                .is_none_or(|x| x <= DESIGN_WIDTH - OBSTACLE_SPACING);
        if due {
            self.spawn(rng, collision_radius);
        }
        due
    }

    /// Unconditionally append a gate at x = playfield width
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, collision_radius: f32) {
        let top_height = match spawn_bounds(collision_radius) {
            Some((min_top, max_top)) => rng.random_range(min_top..=max_top) as f32,
            None => {
                log::warn!(
                    "Collision radius {collision_radius} leaves no reachable gap, centring it"
                );
                centred_top()
            }
        };
        let id = self.next_obstacle_id();
        log::debug!("Spawned obstacle {id} with top height {top_height}");

        self.obstacles.push(Obstacle {
            id,
            x: DESIGN_WIDTH,
            top_height,
            bottom_height: DESIGN_HEIGHT - OBSTACLE_GAP - top_height,
            scored: false,
        });
        self.last_spawn_x = Some(DESIGN_WIDTH);
    }

    /// Scroll every gate left by `speed`, then check it against the entity.
    ///
    /// Decisions are collected in a single pass and removals applied after
    /// it, so retiring a gate never shifts the ones still being examined.
    pub fn advance(&mut self, speed: f32, entity: &Entity) -> AdvanceOutcome {
        let r = entity.collision_radius;
        let left = entity.pos.x - r;
        let right = entity.pos.x + r;
        let mut outcome = AdvanceOutcome::default();

        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;

            let overlaps_x = right > obstacle.x && left < obstacle.right_edge();
            let outside_gap =
                entity.pos.y - r < obstacle.top_height || entity.pos.y + r > obstacle.bottom_top();
            if overlaps_x && outside_gap {
                outcome.collided = true;
            }

            if !obstacle.scored && obstacle.right_edge() < left {
                obstacle.scored = true;
                outcome.scored += 1;
            }
        }

        if let Some(x) = self.last_spawn_x.as_mut() {
            *x -= speed;
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right_edge() >= 0.0);
        outcome.retired = before - self.obstacles.len();

        outcome
    }
}
