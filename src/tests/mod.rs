#![warn(clippy::all, clippy::pedantic)]

// Test modules
pub mod app_tests;
pub mod commentary_tests;
pub mod screenshake_tests;
pub mod state_tests;
pub mod ui_tests;
