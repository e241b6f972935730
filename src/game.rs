#![warn(clippy::all, clippy::pedantic)]

use ratatui::style::Color;

// Playfield in world units; the renderer scales it into the terminal
pub const CANVAS_WIDTH: f64 = 400.0;
pub const CANVAS_HEIGHT: f64 = 650.0;

// Tower geometry
pub const INITIAL_BLOCK_WIDTH: f64 = 160.0;
pub const BLOCK_HEIGHT: f64 = 50.0;
pub const GROUND_HEIGHT: f64 = 40.0;
pub const HOVER_OFFSET: f64 = 220.0; // Gap between the swinging block and the top of the tower

// Swing and fall
pub const SWING_AMPLITUDE: f64 = 130.0;
pub const BASE_SPEED: f64 = 0.045; // Radians per tick at score 0
pub const SPEED_GAIN: f64 = 0.0018; // Extra radians per tick for every point scored
pub const GRAVITY: f64 = 0.85;
pub const DROP_IMPULSE: f64 = 8.5;

// Resolution thresholds
pub const PERFECT_THRESHOLD: f64 = 6.0;
pub const MIN_OVERLAP: f64 = 12.0;

// Effects
pub const CAMERA_EASING: f64 = 0.07;
pub const CAMERA_SCROLL_AFTER: usize = 3; // Tower length before the camera starts following
pub const PERFECT_SHAKE: f64 = 15.0;
pub const SHAKE_DECAY: f64 = 0.85;
pub const BURST_PARTICLES: usize = 15;
pub const BURST_SPREAD: f64 = 12.0;
pub const PARTICLE_DECAY: f64 = 0.025;
pub const PARTICLE_COLOR: Color = Color::Rgb(0xfb, 0xbf, 0x24);

// Theme progression
pub const POINTS_PER_THEME: u32 = 12;
pub const POINTS_PER_SKY: u32 = 10;
pub const STARS_AFTER: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingTheme {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub window: Color,
}

pub const BUILDING_THEMES: [BuildingTheme; 5] = [
    BuildingTheme {
        name: "Modern Steel",
        primary: Color::Rgb(0x47, 0x55, 0x69),
        secondary: Color::Rgb(0x94, 0xa3, 0xb8),
        window: Color::Rgb(0xfe, 0xf0, 0x8a),
    },
    BuildingTheme {
        name: "Classic Brick",
        primary: Color::Rgb(0x78, 0x35, 0x0f),
        secondary: Color::Rgb(0xb4, 0x53, 0x09),
        window: Color::Rgb(0xfd, 0xe6, 0x8a),
    },
    BuildingTheme {
        name: "Glass Tower",
        primary: Color::Rgb(0x1e, 0x3a, 0x8a),
        secondary: Color::Rgb(0x3b, 0x82, 0xf6),
        window: Color::Rgb(0xbf, 0xdb, 0xfe),
    },
    BuildingTheme {
        name: "Eco Green",
        primary: Color::Rgb(0x14, 0x53, 0x2d),
        secondary: Color::Rgb(0x22, 0xc5, 0x5e),
        window: Color::Rgb(0xdc, 0xfc, 0xe7),
    },
    BuildingTheme {
        name: "Cyberpunk",
        primary: Color::Rgb(0x58, 0x1c, 0x87),
        secondary: Color::Rgb(0xa8, 0x55, 0xf7),
        window: Color::Rgb(0xf3, 0xe8, 0xff),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyPhase {
    pub label: &'static str,
    pub top: Color,
    pub bottom: Color,
}

pub const SKY_PHASES: [SkyPhase; 6] = [
    SkyPhase {
        label: "Morning",
        top: Color::Rgb(0xe0, 0xf6, 0xff),
        bottom: Color::Rgb(0x87, 0xce, 0xeb),
    },
    SkyPhase {
        label: "Forenoon",
        top: Color::Rgb(0xa6, 0xd5, 0xff),
        bottom: Color::Rgb(0x4f, 0xa4, 0xff),
    },
    SkyPhase {
        label: "Sunset",
        top: Color::Rgb(0xff, 0xda, 0xb9),
        bottom: Color::Rgb(0xff, 0x7f, 0x50),
    },
    SkyPhase {
        label: "Dusk",
        top: Color::Rgb(0x70, 0x80, 0x90),
        bottom: Color::Rgb(0x2f, 0x4f, 0x4f),
    },
    SkyPhase {
        label: "Night",
        top: Color::Rgb(0x00, 0x00, 0x33),
        bottom: Color::Rgb(0x19, 0x19, 0x70),
    },
    SkyPhase {
        label: "Space",
        top: Color::Rgb(0x00, 0x00, 0x00),
        bottom: Color::Rgb(0x00, 0x00, 0x11),
    },
];

/// Theme used for blocks spawned at the given score.
#[must_use]
pub fn theme_for_score(score: u32) -> &'static BuildingTheme {
    let index = (score / POINTS_PER_THEME) as usize;
    &BUILDING_THEMES[index.min(BUILDING_THEMES.len() - 1)]
}

#[must_use]
pub fn sky_for_score(score: u32) -> &'static SkyPhase {
    let index = (score / POINTS_PER_SKY) as usize;
    &SKY_PHASES[index.min(SKY_PHASES.len() - 1)]
}

/// Angular speed of a block spawned at the given score.
#[must_use]
pub fn swing_speed(score: u32) -> f64 {
    BASE_SPEED + f64::from(score) * SPEED_GAIN
}
