//! Gates and the scrolling gate stream
//!
//! A gate is a pair of obstacle rectangles with a fixed-height opening. The
//! stream keeps a constant number of gates in ascending x order, recycling
//! the head gate once it has left the screen.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::GameConfig;

/// A top/bottom obstacle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Left edge, decreases as the gate scrolls
    pub x: f32,
    /// Vertical middle of the opening
    pub gap_center: i32,
    /// Set once the trailing edge has crossed the ship
    pub passed: bool,
}

impl Gate {
    pub fn new(x: f32, gap_center: i32) -> Self {
        Self {
            x,
            gap_center,
            passed: false,
        }
    }

    /// From the top of the screen down to the opening
    pub fn top_rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.x as i32,
            0,
            config.gate_w,
            self.gap_center - config.half_gap(),
        )
    }

    /// From the opening down to the bottom of the screen
    pub fn bottom_rect(&self, config: &GameConfig) -> Rect {
        let by = self.gap_center + config.half_gap();
        Rect::new(self.x as i32, by, config.gate_w, config.height - by)
    }

    /// Both obstacle rects, top first (may be degenerate)
    pub fn rects(&self, config: &GameConfig) -> [Rect; 2] {
        [self.top_rect(config), self.bottom_rect(config)]
    }

    /// Obstacle rects with positive area, the only ones safe to draw or test
    pub fn solid_rects(&self, config: &GameConfig) -> impl Iterator<Item = Rect> {
        self.rects(config).into_iter().filter(|r| !r.is_degenerate())
    }

    #[inline]
    pub fn trailing_edge(&self, config: &GameConfig) -> f32 {
        self.x + config.gate_w as f32
    }

    pub fn scroll(&mut self, dt: f32, config: &GameConfig) {
        self.x -= config.scroll_speed * dt;
    }
}

/// Ordered queue of gates with a seeded gap generator
#[derive(Debug, Clone)]
pub struct GateStream {
    gates: VecDeque<Gate>,
    rng: Pcg32,
}

impl GateStream {
    /// Create a stream and fill it with the initial gates
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let mut stream = Self {
            gates: VecDeque::with_capacity(config.gate_count),
            rng: Pcg32::seed_from_u64(seed),
        };
        stream.reset(config);
        stream
    }

    /// Append a gate at `x` with a random gap center
    pub fn spawn(&mut self, x: f32, config: &GameConfig) {
        let gap_center = self.rng.random_range(config.gap_center_range());
        self.gates.push_back(Gate::new(x, gap_center));
    }

    /// Drop all gates and lay out a fresh set past the right edge
    pub fn reset(&mut self, config: &GameConfig) {
        self.gates.clear();
        let first = config.first_gate_x();
        for i in 0..config.gate_count {
            self.spawn(first + i as f32 * config.gate_spacing, config);
        }
    }

    /// Scroll, recycle the head gate if it left the screen, and mark gates
    /// whose trailing edge crossed `ship_x`.
    ///
    /// Returns how many gates were passed this tick.
    pub fn tick(&mut self, dt: f32, ship_x: f32, config: &GameConfig) -> u32 {
        for gate in &mut self.gates {
            gate.scroll(dt, config);
        }

        let head_gone = self
            .gates
            .front()
            .is_some_and(|g| g.trailing_edge(config) < -config.despawn_margin);
        if head_gone {
            self.gates.pop_front();
            let tail_x = self
                .gates
                .back()
                .map_or(config.first_gate_x(), |g| g.x);
            self.spawn(tail_x + config.gate_spacing, config);
            log::debug!("Recycled head gate, new tail at x={}", tail_x + config.gate_spacing);
        }

        let mut passed = 0;
        for gate in &mut self.gates {
            if !gate.passed && gate.trailing_edge(config) < ship_x {
                gate.passed = true;
                passed += 1;
            }
        }
        passed
    }

    pub fn gates(&self) -> &VecDeque<Gate> {
        &self.gates
    }

    #[cfg(test)]
    pub(crate) fn gates_mut(&mut self) -> &mut VecDeque<Gate> {
        &mut self.gates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}
