//! Frame loop and the collaborator seams around the core
//!
//! One thread, strict order per frame: poll input, run fixed simulation
//! steps out of an accumulator, hand a read-only `Frame` to the render sink,
//! then sleep off the rest of the frame budget.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::sim::{CollisionMask, GameEvent, GameState, Rect, RunState, Sprite, TickInput, tick};

/// Coalesced input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub flap: bool,
    pub restart: bool,
    pub quit: bool,
}

impl FrameInput {
    /// Merge two inputs; any press wins
    pub fn merge(self, other: FrameInput) -> FrameInput {
        FrameInput {
            flap: self.flap || other.flap,
            restart: self.restart || other.restart,
            quit: self.quit || other.quit,
        }
    }
}

/// Delivers discrete input once per frame
pub trait InputSource {
    fn poll(&mut self) -> io::Result<FrameInput>;
}

/// Seconds elapsed since the previous call
pub trait Clock {
    fn elapsed(&mut self) -> f32;
}

/// Consumes a snapshot of the game after each frame's simulation
pub trait RenderSink {
    fn present(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Wall clock backed by `Instant`
#[derive(Debug)]
pub struct SystemClock {
    last: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Thrust flame presentation data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub nozzle: Vec2,
    pub length: f32,
    /// Remaining thrust, 1.0 right after a flap
    pub fraction: f32,
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub width: i32,
    pub height: i32,
    pub ship_rect: Rect,
    pub ship_angle: f32,
    pub ship_sprite: &'a Sprite,
    pub ship_mask: &'a CollisionMask,
    pub thrust: Option<Thrust>,
    /// Gate obstacle rects with positive area only
    pub gate_rects: Vec<Rect>,
    pub run: RunState,
    /// Seconds since the driver started, for cosmetic animation
    pub time: f32,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState, time: f32) -> Self {
        let config = state.config();
        let ship = &state.ship;
        let thrust = ship.thrust_active().then(|| Thrust {
            nozzle: ship.nozzle_pos(),
            length: ship.flame_length(),
            fraction: ship.thrust_fraction(config),
        });
        Self {
            width: config.width,
            height: config.height,
            ship_rect: ship.rect(),
            ship_angle: ship.angle_deg(),
            ship_sprite: ship.sprite(),
            ship_mask: ship.mask(),
            thrust,
            gate_rects: state.gates.iter().flat_map(|g| g.solid_rects(config)).collect(),
            run: state.run,
            time,
        }
    }
}

/// Fixed-step accumulator with pending one-shot input
#[derive(Debug, Default)]
pub struct Stepper {
    accumulator: f32,
    pending: TickInput,
}

impl Stepper {
    /// Queue input for the next substep; presses coalesce until consumed
    pub fn queue(&mut self, input: FrameInput) {
        self.pending.flap |= input.flap;
        self.pending.restart |= input.restart;
    }

    /// Feed `frame_dt` seconds and run as many fixed steps as fit.
    ///
    /// One-shot input goes to the first substep; if no substep runs it stays
    /// pending for the next frame.
    pub fn advance(&mut self, state: &mut GameState, frame_dt: f32) -> Vec<GameEvent> {
        let config = state.config();
        let sim_dt = config.sim_dt;
        let max_substeps = config.max_substeps;
        self.accumulator += frame_dt.clamp(0.0, config.max_frame_dt);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= sim_dt && substeps < max_substeps {
            let input = std::mem::take(&mut self.pending);
            events.extend(tick(state, &input, sim_dt));
            self.accumulator -= sim_dt;
            substeps += 1;
        }
        events
    }

    #[inline]
    pub fn pending(&self) -> TickInput {
        self.pending
    }
}

/// Sleeps off whatever is left of the frame budget
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frame_start: Instant::now(),
        }
    }

    /// The frame loop's only suspension point
    pub fn wait(&mut self) {
        let spent = self.frame_start.elapsed();
        if let Some(rest) = self.frame.checked_sub(spent) {
            thread::sleep(rest);
        }
        self.frame_start = Instant::now();
    }
}

/// Whether the loop should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the game and the frame-level bookkeeping
#[derive(Debug)]
pub struct Driver {
    pub state: GameState,
    stepper: Stepper,
    time: f32,
    frames: u64,
}

impl Driver {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            stepper: Stepper::default(),
            time: 0.0,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Poll, simulate, present. Returns `Quit` on quit input (nothing is
    /// simulated or drawn for that frame).
    pub fn frame<I, C, R>(&mut self, input: &mut I, clock: &mut C, sink: &mut R) -> io::Result<Flow>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        R: RenderSink + ?Sized,
    {
        let dt = clock.elapsed();
        let polled = input.poll()?;
        if polled.quit {
            log::info!("Quit after {} frames (best {})", self.frames, self.state.run.best);
            return Ok(Flow::Quit);
        }

        self.stepper.queue(polled);
        for event in self.stepper.advance(&mut self.state, dt) {
            log::trace!("{event:?}");
        }

        self.time += dt;
        self.frames += 1;
        sink.present(&Frame::capture(&self.state, self.time))?;
        Ok(Flow::Continue)
    }

    /// Run frames until quit, pacing to the configured frame rate
    pub fn run<I, C, R>(&mut self, input: &mut I, clock: &mut C, sink: &mut R) -> io::Result<RunState>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        R: RenderSink + ?Sized,
    {
        let mut pacer = FramePacer::new(self.state.config().target_fps);
        while self.frame(input, clock, sink)? == Flow::Continue {
            pacer.wait();
        }
        Ok(self.state.run)
    }
}
