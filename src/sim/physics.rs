//! Entity physics
//!
//! One step per tick: gravity into velocity, velocity into position. The
//! caller owns session state and decides what a boundary hit means.

use super::state::Entity;
use crate::consts::FLAP_VELOCITY_FACTOR;

impl Entity {
    /// Advance one tick. Returns true if the entity now touches the top or
    /// bottom of a playfield of the given height.
    pub fn step(&mut self, playfield_height: f32) -> bool {
        self.velocity += self.gravity;
        self.pos.y += self.velocity;

        // Flap faster during fast climbs and dives
        self.flap_timer += self.velocity.abs() * FLAP_VELOCITY_FACTOR + self.flap_rate;
        if self.flap_timer >= 1.0 {
            self.flap_timer = 0.0;
            self.flapping = !self.flapping;
        }

        self.out_of_bounds(playfield_height)
    }

    pub fn out_of_bounds(&self, playfield_height: f32) -> bool {
        self.pos.y + self.collision_radius > playfield_height
            || self.pos.y - self.collision_radius < 0.0
    }

    /// Replace the current velocity with the jump impulse
    pub fn apply_jump(&mut self) {
        self.velocity = self.jump;
        self.flapping = true;
    }
}
