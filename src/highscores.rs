//! Persisted best score
//!
//! Stored in LocalStorage as a bare integer, so scores saved by earlier
//! builds of the game still load.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Best score across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScore(pub u64);

impl BestScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappyHighScore";

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Record a finished session's score.
    /// Returns true if it beat the previous best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.0 {
            self.0 = score;
            true
        } else {
            false
        }
    }

    /// Load the best score, 0 if absent
    pub fn load() -> Self {
        match persistence::load_json::<BestScore>(Self::STORAGE_KEY) {
            Some(best) => {
                log::info!("Loaded best score {}", best.0);
                best
            }
            None => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("Best score saved ({})", self.0);
        }
    }
}
