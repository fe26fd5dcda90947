//! Game settings and preferences
//!
//! The tunables exposed in the settings menu. Persisted in LocalStorage and
//! snapshotted into the world whenever a session starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::persistence;

/// Rejected tunables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("scroll speed must be a positive finite number, got {0}")]
    InvalidSpeed(f32),
    #[error("{name} must be at least 1")]
    InvalidRadius { name: &'static str },
    #[error("collision radius {collision_radius} leaves no room for the gap (max {max})")]
    GapUnreachable { collision_radius: u32, max: u32 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Obstacle scroll speed (units per tick)
    pub scroll_speed: f32,
    /// Radius the entity is drawn with
    pub entity_radius: u32,
    /// Radius used for hit detection, independent of the drawn radius
    pub collision_radius: u32,
    /// Play sound effects and music
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            entity_radius: DEFAULT_ENTITY_RADIUS,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappy_cow_settings";

    /// Largest collision radius that still leaves a reachable gap
    pub fn max_collision_radius() -> u32 {
        let room = (DESIGN_HEIGHT - OBSTACLE_GAP) / 2.0 - SPAWN_MARGIN;
        room.max(0.0).floor() as u32
    }

    /// Check that these tunables describe a playable game
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(SettingsError::InvalidSpeed(self.scroll_speed));
        }
        if self.entity_radius == 0 {
            return Err(SettingsError::InvalidRadius {
                name: "entity radius",
            });
        }
        if self.collision_radius == 0 {
            return Err(SettingsError::InvalidRadius {
                name: "collision radius",
            });
        }
        let max = Self::max_collision_radius();
        if self.collision_radius > max {
            return Err(SettingsError::GapUnreachable {
                collision_radius: self.collision_radius,
                max,
            });
        }
        Ok(())
    }

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        match persistence::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from LocalStorage");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings rejected ({e}), using defaults");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        if persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
