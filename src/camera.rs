#![warn(clippy::all, clippy::pedantic)]

use crate::components::Camera;
use crate::game::{BLOCK_HEIGHT, CAMERA_EASING, CAMERA_SCROLL_AFTER};

impl Camera {
    /// Exponential approach toward the target. With a coefficient below one
    /// the offset never overshoots.
    pub fn ease(&mut self) {
        self.current_y += (self.target_y - self.current_y) * CAMERA_EASING;
    }

    /// Scrolls one block further once the tower is taller than the
    /// initially visible stack. `tower_len` counts the freshly placed block.
    pub fn follow(&mut self, tower_len: usize) {
        if tower_len > CAMERA_SCROLL_AFTER {
            self.target_y += BLOCK_HEIGHT;
        }
    }
}
