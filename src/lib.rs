//! Blade Rush - hand-tracked fruit slicing arcade core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (spawning, physics, slicing, game state)
//! - `platform`: Wall clock abstraction
//! - `tuning`: Data-driven game balance
//!
//! Hand tracking, rendering and audio live outside this crate; they feed a
//! [`sim::Hands`] snapshot in and observe [`sim::GameEvent`]s coming out.

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the driving loop should pass to `update`
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Visible screen area is [0, 1] x [0, 1], y grows downward
    pub const SCREEN_MIN: f32 = 0.0;
    pub const SCREEN_MAX: f32 = 1.0;

    /// Spawn x range, kept away from the side edges
    pub const SPAWN_X_MIN: f32 = 0.15;
    pub const SPAWN_X_MAX: f32 = 0.85;
    /// Horizontal spacing between objects of the same batch
    pub const SPAWN_BATCH_SPACING: f32 = 0.12;

    /// Hand speed below which a split falls back to a horizontal direction
    pub const SPLIT_EPSILON: f32 = 1e-4;
    /// Base separation speed of split pieces
    pub const SPLIT_BASE_SPREAD: f32 = 0.15;
    /// Extra separation speed per unit of hand speed
    pub const SPLIT_SPREAD_PER_SPEED: f32 = 0.1;
    pub const SPLIT_MAX_SPREAD: f32 = 0.6;
    /// Upward kick given to both pieces
    pub const SPLIT_UPWARD_BIAS: f32 = 0.1;
    /// Number of further cuts a freshly spawned fruit allows
    pub const INITIAL_SLICES: u8 = 2;
}

/// Perpendicular of a vector (rotated +90°)
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Whether a point lies outside the visible screen by more than `margin`
#[inline]
pub fn outside_screen(pos: Vec2, margin: f32) -> bool {
    use consts::{SCREEN_MAX, SCREEN_MIN};
    pos.y > SCREEN_MAX + margin || pos.x < SCREEN_MIN - margin || pos.x > SCREEN_MAX + margin
}
