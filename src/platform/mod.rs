//! Platform helpers
//!
//! Pure functions the browser host uses:
//! - Fitting the fixed-aspect playfield into the window
//! - Mapping raw key presses to commands

use crate::consts::{DESIGN_HEIGHT, DESIGN_WIDTH};
use crate::sim::Command;

/// CSS size for the canvas: the largest box with the playfield's aspect ratio
/// that fits inside the window. The logical size stays at the design size.
pub fn fit_viewport(window_width: f64, window_height: f64) -> (f64, f64) {
    let aspect = DESIGN_WIDTH as f64 / DESIGN_HEIGHT as f64;
    let width = window_width;
    let height = window_width / aspect;
    if height > window_height {
        (window_height * aspect, window_height)
    } else {
        (width, height)
    }
}

/// Keyboard shortcut for a key name (`KeyboardEvent.key`)
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        " " | "ArrowUp" | "w" | "W" => Some(Command::Jump),
        _ => None,
    }
}
