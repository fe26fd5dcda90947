//! Session state machine
//!
//! Idle -> Running on start, Running -> Over on collision, Over -> Running on
//! play again, anything -> Idle on main menu. Starting always resets first, so
//! duplicate start commands are harmless.

use super::state::{SessionMode, World};
use crate::settings::{Settings, SettingsError};

impl World {
    /// Start a fresh session from any mode (start and play-again)
    pub fn begin_session(&mut self) {
        self.reset();
        self.scroll_speed = self.settings.scroll_speed;
        self.stream.spawn(&mut self.rng, self.entity.collision_radius);
        self.mode = SessionMode::Running;
        log::info!(
            "Session started (speed {}, radius {}, hit radius {})",
            self.scroll_speed,
            self.entity.radius,
            self.entity.collision_radius
        );
    }

    /// Full reset back to the menus
    pub fn return_to_menu(&mut self) {
        self.reset();
        self.mode = SessionMode::Idle;
        log::info!("Returned to main menu");
    }

    /// Freeze the session after a collision. Returns `None` if the session was
    /// not running, otherwise whether the score set a new best.
    pub fn end_session(&mut self) -> Option<bool> {
        if self.mode != SessionMode::Running {
            return None;
        }
        self.mode = SessionMode::Over;
        let new_best = self.best.record(self.score);
        log::info!(
            "Session over: score {} (best {}{})",
            self.score,
            self.best.get(),
            if new_best { ", new best" } else { "" }
        );
        Some(new_best)
    }

    /// Replace the tunables used by the next session.
    ///
    /// Invalid tunables are rejected and the current ones kept. Outside a
    /// running session the entity picks up the new radii straight away.
    pub fn configure(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        if self.mode != SessionMode::Running {
            self.entity.apply_radii(&settings);
        }
        self.settings = settings;
        Ok(())
    }

    fn reset(&mut self) {
        self.entity.reset(&self.settings);
        self.stream.clear();
        self.score = 0;
        self.background_x = 0.0;
        self.time_ticks = 0;
    }
}
