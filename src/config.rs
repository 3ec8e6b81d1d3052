//! Game tunables
//!
//! One immutable structure built at startup and passed by reference to every
//! component. Loaded from JSON when a config file is given, otherwise the
//! defaults below.

use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// All simulation and presentation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub width: i32,
    pub height: i32,

    // === Timing ===
    /// Frame-pacing target for the driver
    pub target_fps: u32,
    /// Fixed simulation step (seconds)
    pub sim_dt: f32,
    /// Maximum substeps per frame to prevent spiral of death
    pub max_substeps: u32,
    /// Frame dt is clamped to this before feeding the accumulator
    pub max_frame_dt: f32,

    // === Ship physics ===
    pub gravity: f32,
    pub flap_vy: f32,
    /// Downward speed cap; upward speed is never clamped
    pub max_vy: f32,
    pub ship_w: u32,
    pub ship_h: u32,
    /// Seconds the thrust flame stays lit after a flap
    pub thrust_time: f32,
    /// Alpha strictly above this counts as solid
    pub mask_threshold: u8,
    /// Nozzle anchor inset from the opaque bbox left edge
    pub nozzle_inset: i32,

    // === Gates ===
    pub gate_w: i32,
    pub gate_gap: i32,
    pub gate_min: i32,
    pub gate_max: i32,
    pub gate_spacing: f32,
    pub scroll_speed: f32,
    /// First gate spawns this far past the right edge
    pub spawn_offset: f32,
    /// Head gate is recycled once its trailing edge is left of `-despawn_margin`
    pub despawn_margin: f32,
    pub gate_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        let height = 720;
        Self {
            width: 480,
            height,

            target_fps: 60,
            sim_dt: 1.0 / 60.0,
            max_substeps: 8,
            max_frame_dt: 0.1,

            gravity: 1400.0,
            flap_vy: -460.0,
            max_vy: 900.0,
            ship_w: 72,
            ship_h: 72,
            thrust_time: 0.18,
            mask_threshold: 10,
            nozzle_inset: 2,

            gate_w: 92,
            gate_gap: 200,
            gate_min: 70,
            gate_max: height - 230,
            gate_spacing: 250.0,
            scroll_speed: 260.0,
            spawn_offset: 120.0,
            despawn_margin: 20.0,
            gate_count: 4,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Half the gap height (floor division)
    #[inline]
    pub fn half_gap(&self) -> i32 {
        self.gate_gap.div_euclid(2)
    }

    /// Inclusive range the gap center is sampled from
    pub fn gap_center_range(&self) -> RangeInclusive<i32> {
        (self.gate_min + self.half_gap())..=(self.gate_max - self.half_gap())
    }

    /// Ship spawn point (quarter across, half down)
    pub fn ship_start(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.25, self.height as f32 * 0.5)
    }

    /// X of the first gate spawned on reset
    pub fn first_gate_x(&self) -> f32 {
        self.width as f32 + self.spawn_offset
    }

    /// Reject tunables the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let fail = |reason: String| Err(GameError::InvalidConfig(reason));

        if self.width <= 0 || self.height <= 0 {
            return fail(format!("playfield {}x{} is empty", self.width, self.height));
        }
        if !(self.sim_dt > 0.0) || !(self.max_frame_dt > 0.0) {
            return fail("timesteps must be positive".to_string());
        }
        if self.max_substeps == 0 || self.target_fps == 0 {
            return fail("max_substeps and target_fps must be at least 1".to_string());
        }
        if !(self.max_vy > 0.0) {
            return fail(format!("max_vy {} must be positive", self.max_vy));
        }
        if self.ship_w == 0 || self.ship_h == 0 {
            return fail(format!("ship size {}x{} is empty", self.ship_w, self.ship_h));
        }
        if self.thrust_time < 0.0 || self.scroll_speed < 0.0 || self.despawn_margin < 0.0 {
            return fail("thrust_time, scroll_speed and despawn_margin must be >= 0".to_string());
        }
        if self.gate_w <= 0 || self.gate_gap <= 0 {
            return fail(format!(
                "gate width {} and gap {} must be positive",
                self.gate_w, self.gate_gap
            ));
        }
        if self.gate_count == 0 {
            return fail("gate_count must be at least 1".to_string());
        }
        if !(self.gate_spacing > 0.0) {
            return fail(format!("gate_spacing {} must be positive", self.gate_spacing));
        }
        if self.gate_min < 0 || self.gate_max > self.height {
            return fail(format!(
                "gap bounds [{}, {}] leave the playfield [0, {}]",
                self.gate_min, self.gate_max, self.height
            ));
        }
        let range = self.gap_center_range();
        if range.is_empty() {
            return fail(format!(
                "gap center range [{}, {}] is empty (gate_min {}, gate_max {}, gap {})",
                range.start(),
                range.end(),
                self.gate_min,
                self.gate_max,
                self.gate_gap
            ));
        }
        Ok(())
    }
}
