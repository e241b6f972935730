#![warn(clippy::all, clippy::pedantic)]

//! Motion of the active block: the crane swing and the free fall after a drop.

use crate::components::{ActiveBlock, SettledBlock};
use crate::game::{
    BLOCK_HEIGHT, CANVAS_WIDTH, DROP_IMPULSE, GRAVITY, HOVER_OFFSET, SWING_AMPLITUDE, swing_speed,
    theme_for_score,
};

/// Height at which a swinging block hangs above `top`.
#[must_use]
pub fn hover_y(top: &SettledBlock) -> f64 {
    top.y - BLOCK_HEIGHT - HOVER_OFFSET
}

// Left edge of a block of `width` whose centre swings around the canvas centre
fn swing_x(phase: f64, width: f64) -> f64 {
    CANVAS_WIDTH / 2.0 + phase.sin() * SWING_AMPLITUDE - width / 2.0
}

impl ActiveBlock {
    /// Spawns a block above `top`, inheriting its width. Colour and swing
    /// speed follow the score at the moment of spawning.
    #[must_use]
    pub fn spawn(top: &SettledBlock, score: u32, phase: f64) -> Self {
        Self {
            x: swing_x(phase, top.width),
            y: hover_y(top),
            width: top.width,
            height: BLOCK_HEIGHT,
            color: theme_for_score(score).primary,
            phase,
            angular_speed: swing_speed(score),
            is_falling: false,
            fall_velocity: 0.0,
        }
    }

    /// Advances the swing by one tick. The horizontal position is not clamped
    /// to the canvas, and the height is re-pinned to the current tower top.
    pub fn swing(&mut self, top: &SettledBlock) {
        self.phase += self.angular_speed;
        self.x = swing_x(self.phase, self.width);
        self.y = hover_y(top);
    }

    /// Releases the block. Returns false if it was already falling.
    pub fn release(&mut self) -> bool {
        if self.is_falling {
            return false;
        }
        self.is_falling = true;
        self.fall_velocity = DROP_IMPULSE;
        true
    }

    /// One symplectic Euler step: position first, then velocity.
    pub fn fall(&mut self) {
        self.y += self.fall_velocity;
        self.fall_velocity += GRAVITY;
    }

    /// True once the bottom edge reaches or passes the top edge of `top`.
    #[must_use]
    pub fn has_landed_on(&self, top: &SettledBlock) -> bool {
        self.bottom() >= top.y
    }

    /// Swing or fall, whichever applies this tick.
    pub fn advance(&mut self, top: &SettledBlock) {
        if self.is_falling {
            self.fall();
        } else {
            self.swing(top);
        }
    }
}
