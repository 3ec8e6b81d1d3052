//! Game state and run bookkeeping
//!
//! `GameState` exclusively owns the ship, the gate stream and the run
//! counters. Nothing here is shared; the presentation layer only ever sees
//! a read-only snapshot after a tick.

use serde::{Deserialize, Serialize};

use super::collision::CrashCause;
use super::gate::GateStream;
use super::ship::Ship;
use super::sprite::Sprite;
use crate::config::GameConfig;
use crate::error::GameError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh entities, waiting for the first flap
    Idle,
    /// Ship is flying
    Active,
    /// Run ended; score frozen until reset
    Over,
}

/// Score and lifecycle flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    /// Best score this session; survives resets, never persisted
    pub best: u32,
    pub started: bool,
    pub running: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            best: 0,
            started: false,
            running: true,
        }
    }
}

impl RunState {
    pub fn phase(&self) -> GamePhase {
        match (self.started, self.running) {
            (_, false) => GamePhase::Over,
            (true, true) => GamePhase::Active,
            (false, true) => GamePhase::Idle,
        }
    }

    /// One gate passed
    pub fn add_point(&mut self) {
        self.score += 1;
        self.best = self.best.max(self.score);
    }

    /// Back to a not-started run, keeping the session best
    pub fn reset(&mut self) {
        *self = Self {
            best: self.best,
            ..Self::default()
        };
    }
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Entities rebuilt; run is back in the not-started state
    Reset,
    /// First flap of a run
    Started,
    Flapped,
    GatePassed { score: u32 },
    Crashed { cause: CrashCause, score: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    /// Seed the gate generator was created with
    pub seed: u64,
    pub ship: Ship,
    pub gates: GateStream,
    pub run: RunState,
    /// Active ticks simulated in the current run
    pub run_ticks: u64,
    /// Kept to rebuild the ship on reset
    ship_sprite: Sprite,
}

impl GameState {
    /// Validate the config and build a fresh, not-started game
    pub fn new(config: GameConfig, ship_sprite: Sprite, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        ship_sprite.check().map_err(|reason| GameError::AssetFormat {
            name: "ship sprite".to_string(),
            reason,
        })?;

        let ship = Ship::new(&config, &ship_sprite);
        let gates = GateStream::new(seed, &config);
        log::info!("New game (seed {seed})");

        Ok(Self {
            config,
            seed,
            ship,
            gates,
            run: RunState::default(),
            run_ticks: 0,
            ship_sprite,
        })
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.run.phase()
    }

    /// Rebuild ship and gates; lands in the not-started state
    pub fn reset(&mut self) {
        self.ship = Ship::new(&self.config, &self.ship_sprite);
        self.gates.reset(&self.config);
        self.run.reset();
        self.run_ticks = 0;
        log::info!("Run reset (best {})", self.run.best);
    }

    /// Stop the run; only reset brings it back
    pub(crate) fn end_run(&mut self, cause: CrashCause) -> GameEvent {
        self.run.running = false;
        log::info!(
            "Run over after {} ticks: {:?}, score {}, best {}",
            self.run_ticks,
            cause,
            self.run.score,
            self.run.best
        );
        GameEvent::Crashed {
            cause,
            score: self.run.score,
        }
    }
}
