//! Simulation core
//!
//! All gameplay logic lives here:
//! - One tick per displayed frame, run to completion
//! - Host input arrives as queued commands, applied at the start of a tick
//! - No rendering, audio or platform dependencies

pub mod obstacles;
pub mod physics;
pub mod session;
pub mod state;
pub mod tick;

pub use obstacles::{AdvanceOutcome, spawn_bounds};
pub use state::{
    Entity, EntityView, Obstacle, ObstacleStream, ObstacleView, SessionMode, Snapshot, World,
};
pub use tick::{Command, GameEvent, TickInput, tick};
