//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable gate order (ascending x)
//! - No rendering or platform dependencies

pub mod collision;
pub mod gate;
pub mod mask;
pub mod rect;
pub mod ship;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{
    CrashCause, GateSide, boundary_violation, check_collision, first_collision,
    mask_rect_collision,
};
pub use gate::{Gate, GateStream};
pub use mask::CollisionMask;
pub use rect::Rect;
pub use ship::{Ship, tilt_for_velocity};
pub use sprite::{Rgba, Sprite};
pub use state::{GameEvent, GamePhase, GameState, RunState};
pub use tick::{TickInput, tick};
