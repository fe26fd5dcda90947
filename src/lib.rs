//! Flappy Cow - a flappy-style arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (entity physics, obstacle stream, session state)
//! - `settings`: User tunables with validation
//! - `highscores`: Persisted best score
//! - `persistence`: LocalStorage helpers
//! - `platform`: Viewport fitting and host command queue
//! - `audio`: Fire-and-forget sound playback

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::BestScore;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Logical playfield size; the canvas is scaled to fit the window
    pub const DESIGN_WIDTH: f32 = 375.0;
    pub const DESIGN_HEIGHT: f32 = 667.0;

    /// Entity defaults
    pub const ENTITY_X: f32 = 50.0;
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set on jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -10.0;
    /// Base flap animation rate per tick
    pub const FLAP_RATE: f32 = 0.1;
    /// Extra flap rate per unit of |velocity|
    pub const FLAP_VELOCITY_FACTOR: f32 = 0.02;
    pub const DEFAULT_ENTITY_RADIUS: u32 = 20;
    pub const DEFAULT_COLLISION_RADIUS: u32 = 20;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    pub const OBSTACLE_SPACING: f32 = 200.0;
    /// Keeps the gap away from the playfield edges
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Scroll defaults
    pub const DEFAULT_SCROLL_SPEED: f32 = 2.0;
    /// Background parallax relative to obstacle speed
    pub const BACKGROUND_SCROLL_FACTOR: f32 = 0.5;
}
