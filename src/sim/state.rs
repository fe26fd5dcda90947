//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in `World`, which the host owns and
//! passes by exclusive reference into `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::BestScore;
use crate::settings::Settings;

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionMode {
    /// Menus shown, simulation paused, no obstacles
    #[default]
    Idle,
    /// Simulation advances every tick
    Running,
    /// Simulation and score frozen until a reset
    Over,
}

/// The player-controlled body
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// x never changes after spawn
    pub pos: Vec2,
    pub velocity: f32,
    /// Drawn radius
    pub radius: f32,
    /// Hit-detection radius
    pub collision_radius: f32,
    pub gravity: f32,
    /// Velocity set on jump (negative)
    pub jump: f32,
    pub flapping: bool,
    /// Flap animation accumulator, toggles `flapping` when it reaches 1
    pub flap_timer: f32,
    pub flap_rate: f32,
}

impl Entity {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(ENTITY_X, DESIGN_HEIGHT / 2.0),
            velocity: 0.0,
            radius: settings.entity_radius as f32,
            collision_radius: settings.collision_radius as f32,
            gravity: GRAVITY,
            jump: JUMP_IMPULSE,
            flapping: false,
            flap_timer: 0.0,
            flap_rate: FLAP_RATE,
        }
    }

    /// Put the entity back at its spawn point with the given radii
    pub fn reset(&mut self, settings: &Settings) {
        self.pos = Vec2::new(ENTITY_X, DESIGN_HEIGHT / 2.0);
        self.velocity = 0.0;
        self.apply_radii(settings);
        self.flapping = false;
        self.flap_timer = 0.0;
    }

    pub fn apply_radii(&mut self, settings: &Settings) {
        self.radius = settings.entity_radius as f32;
        self.collision_radius = settings.collision_radius as f32;
    }
}

/// A gate: top and bottom segments with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Spawn order
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    /// Already counted towards the score
    pub scored: bool,
}

impl Obstacle {
    pub fn right_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// y where the bottom segment begins
    pub fn bottom_top(&self) -> f32 {
        DESIGN_HEIGHT - self.bottom_height
    }
}

/// Active obstacles in spawn order (which is also left-to-right order)
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    pub obstacles: Vec<Obstacle>,
    /// Current x of the most recently spawned obstacle, tracked on its own so
    /// retirements never disturb spawn spacing
    pub last_spawn_x: Option<f32>,
    next_id: u32,
}

impl ObstacleStream {
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.last_spawn_x = None;
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Allocate the next spawn-order id
    pub(crate) fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// Complete world state
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the obstacle RNG was created with
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub mode: SessionMode,
    pub score: u64,
    pub best: BestScore,
    /// Background scroll, in (-width, 0]
    pub background_x: f32,
    /// Scroll speed snapshotted at session start
    pub scroll_speed: f32,
    /// Validated tunables, applied on the next reset
    pub settings: Settings,
    pub entity: Entity,
    pub stream: ObstacleStream,
    /// Ticks simulated in the current session
    pub time_ticks: u64,
}

impl World {
    /// Create an idle world. Invalid settings are replaced by defaults.
    pub fn new(seed: u64, settings: Settings, best: BestScore) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Rejected initial settings ({e}), using defaults");
                Settings::default()
            }
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: SessionMode::Idle,
            score: 0,
            best,
            background_x: 0.0,
            scroll_speed: settings.scroll_speed,
            entity: Entity::new(&settings),
            settings,
            stream: ObstacleStream::default(),
            time_ticks: 0,
        }
    }

    /// Read-only view for the renderer and HUD
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            score: self.score,
            best_score: self.best.get(),
            background_x: self.background_x,
            entity: EntityView {
                x: self.entity.pos.x,
                y: self.entity.pos.y,
                radius: self.entity.radius,
                flapping: self.entity.flapping,
                flap_phase: self.entity.flap_timer,
            },
            obstacles: self
                .stream
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    width: OBSTACLE_WIDTH,
                    top_height: o.top_height,
                    bottom_height: o.bottom_height,
                })
                .collect(),
        }
    }
}

/// Entity as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub flapping: bool,
    pub flap_phase: f32,
}

/// Obstacle as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub x: f32,
    pub width: f32,
    pub top_height: f32,
    pub bottom_height: f32,
}

/// Per-frame world snapshot polled by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: SessionMode,
    pub score: u64,
    pub best_score: u64,
    pub background_x: f32,
    pub entity: EntityView,
    pub obstacles: Vec<ObstacleView>,
}
