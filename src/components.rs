#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use ratatui::style::Color;

use crate::game::{BLOCK_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, GROUND_HEIGHT, INITIAL_BLOCK_WIDTH};

/// A placed tower segment. Never mutated once it joins the tower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledBlock {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl SettledBlock {
    /// The full-width base block resting on the ground.
    #[must_use]
    pub fn foundation(color: Color) -> Self {
        Self {
            x: (CANVAS_WIDTH - INITIAL_BLOCK_WIDTH) / 2.0,
            y: CANVAS_HEIGHT - BLOCK_HEIGHT - GROUND_HEIGHT,
            width: INITIAL_BLOCK_WIDTH,
            height: BLOCK_HEIGHT,
            color,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// The block hanging from the crane, or falling once dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveBlock {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
    pub phase: f64,
    pub angular_speed: f64,
    pub is_falling: bool,
    pub fall_velocity: f64,
}

impl ActiveBlock {
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

// Particle system for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64, // 1.0 when spawned, removed once it reaches 0
    pub color: Color,
}

/// Vertical scroll of the view, eased toward its target every tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub current_y: f64,
    pub target_y: f64,
}

// Screen shake effect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub magnitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Bird,
    Star,
}

/// Background scenery that keeps moving in every game state
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Decoration {
    pub x: f64,
    pub y: f64,
    pub kind: DecorationKind,
    pub speed: f64,
    pub size: f64,
}

// Input state for the single action plus the mute toggle
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub action: bool,
    pub toggle_mute: bool,
}
