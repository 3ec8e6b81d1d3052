//! Gate Runner - a side-scrolling flap-through-the-gates arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ship physics, gate stream, mask collisions)
//! - `config`: Immutable tunables, validated once at startup
//! - `assets`: Ship sprite provider seam with strict/tolerant fallback
//! - `driver`: Fixed-timestep frame loop and collaborator traits
//! - `term`: Terminal presentation layer (input + render sink)

pub mod assets;
pub mod config;
pub mod driver;
pub mod error;
pub mod sim;
pub mod term;

pub use config::GameConfig;
pub use error::GameError;

use glam::Vec2;

/// Game configuration constants that are not tunables
pub mod consts {
    /// Velocity window that maps onto the rotation range
    pub const ROTATION_VY_WINDOW: f32 = 420.0;
    /// Maximum nose-up / nose-down tilt (degrees)
    pub const MAX_TILT_DEG: f32 = 12.0;

    /// Flame geometry (presentation only)
    pub const FLAME_BASE_LEN: f32 = 26.0;
    pub const FLAME_MIN_LEN: f32 = 14.0;
    pub const FLAME_MAX_LEN: f32 = 50.0;
    pub const FLAME_VEL_GAIN: f32 = 0.04;
    pub const FLAME_VEL_MAX: f32 = 14.0;
}

/// Clamp `value` into `[lo, hi]`
#[inline]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Rotate a screen-space offset (y down) by `degrees`, positive = counter-clockwise on screen
#[inline]
pub fn rotate_screen(offset: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(-degrees.to_radians()).rotate(offset)
}

/// Axis-aligned size of a `w` x `h` box after rotating by `degrees`
pub fn rotated_extent(w: u32, h: u32, degrees: f32) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = w as f32;
    let h = h as f32;
    // Shave float noise so a 0 degree rotation keeps the exact size
    let rw = (w * cos + h * sin - 1e-3).ceil().max(1.0);
    let rh = (w * sin + h * cos - 1e-3).ceil().max(1.0);
    (rw as u32, rh as u32)
}
