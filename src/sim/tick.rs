//! Fixed timestep simulation tick
//!
//! Advances the run state machine by one step:
//! Idle --flap--> Active --crash--> Over --flap--> (reset) Active.
//! Restart from any phase lands in Idle.

use super::collision::{boundary_violation, first_collision};
use super::state::{GameEvent, GameState};

/// Input for a single tick; multiple presses within a tick coalesce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub flap: bool,
    pub restart: bool,
}

/// Advance the game state by one timestep of `dt` seconds.
///
/// Returns the events produced, in the order they happened.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        state.reset();
        events.push(GameEvent::Reset);
    }

    if input.flap {
        if !state.run.running {
            // Click-to-restart: the same flap starts the new run
            state.reset();
            events.push(GameEvent::Reset);
        }
        if !state.run.started {
            state.run.started = true;
            log::info!("Run started");
            events.push(GameEvent::Started);
        }
        state.ship.flap(&state.config);
        events.push(GameEvent::Flapped);
    }

    if !(state.run.started && state.run.running) {
        return events;
    }

    state.run_ticks += 1;
    let config = &state.config;

    state.ship.update(dt, config);

    let passed = state.gates.tick(dt, state.ship.pos.x, config);
    for _ in 0..passed {
        state.run.add_point();
        log::debug!("Gate passed, score {}", state.run.score);
        events.push(GameEvent::GatePassed {
            score: state.run.score,
        });
    }

    // Scoring is settled before either termination check
    if let Some(cause) = boundary_violation(state.ship.rect(), config) {
        events.push(state.end_run(cause));
        return events;
    }

    if let Some(cause) = first_collision(&state.ship, state.gates.iter(), config) {
        events.push(state.end_run(cause));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::collision::CrashCause;
    use crate::sim::gate::Gate;
    use crate::sim::sprite::Sprite;
    use crate::sim::state::GamePhase;

    const DT: f32 = 1.0 / 60.0;

    fn new_state() -> GameState {
        GameState::new(GameConfig::default(), Sprite::placeholder_ship(72, 72), 12345).unwrap()
    }

    fn flap() -> TickInput {
        TickInput {
            flap: true,
            ..Default::default()
        }
    }

    fn restart() -> TickInput {
        TickInput {
            restart: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_does_not_simulate() {
        let mut state = new_state();
        let gates_before = state.gates.gates().clone();
        for _ in 0..30 {
            assert!(tick(&mut state, &TickInput::default(), DT).is_empty());
        }
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.ship.pos.y, 360.0);
        assert_eq!(state.gates.gates(), &gates_before);
    }

    #[test]
    fn test_first_flap_starts_run() {
        let mut state = new_state();
        let events = tick(&mut state, &flap(), DT);
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Flapped]);
        assert_eq!(state.phase(), GamePhase::Active);
        // Flap applied, then one physics step
        assert!((state.ship.vy - (-460.0 + 1400.0 * DT)).abs() < 1e-3);
        assert!(state.ship.pos.y < 360.0);
    }

    #[test]
    fn test_flap_while_active_reapplies_impulse() {
        let mut state = new_state();
        tick(&mut state, &flap(), DT);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let events = tick(&mut state, &flap(), DT);
        assert_eq!(events, vec![GameEvent::Flapped]);
        assert!((state.ship.vy - (-460.0 + 1400.0 * DT)).abs() < 1e-3);
    }

    fn crash(state: &mut GameState) {
        tick(state, &flap(), DT);
        let mut guard = 0;
        while state.run.running {
            tick(state, &TickInput::default(), DT);
            guard += 1;
            assert!(guard < 1000, "ship never crashed");
        }
    }

    #[test]
    fn test_over_freezes_simulation() {
        let mut state = new_state();
        crash(&mut state);
        assert_eq!(state.phase(), GamePhase::Over);
        let y = state.ship.pos.y;
        let head = state.gates.gates()[0].x;
        assert!(tick(&mut state, &TickInput::default(), DT).is_empty());
        assert_eq!(state.ship.pos.y, y);
        assert_eq!(state.gates.gates()[0].x, head);
    }

    #[test]
    fn test_flap_in_over_resets_and_starts() {
        let mut state = new_state();
        crash(&mut state);
        let events = tick(&mut state, &flap(), DT);
        assert_eq!(
            events,
            vec![GameEvent::Reset, GameEvent::Started, GameEvent::Flapped]
        );
        assert_eq!(state.phase(), GamePhase::Active);
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run_ticks, 1);
    }

    #[test]
    fn test_restart_lands_in_idle() {
        let mut state = new_state();
        tick(&mut state, &flap(), DT);
        tick(&mut state, &TickInput::default(), DT);
        let events = tick(&mut state, &restart(), DT);
        assert_eq!(events, vec![GameEvent::Reset]);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.ship.pos.y, 360.0);
        assert_eq!(state.ship.vy, 0.0);
    }

    #[test]
    fn test_scoring_settles_before_boundary() {
        let mut state = new_state();
        tick(&mut state, &flap(), DT);

        // Head gate's trailing edge sits one pixel right of the ship
        let config = state.config().clone();
        let head = state.gates.gates_mut();
        head[0] = Gate::new(120.0 + 1.0 - config.gate_w as f32, 360);

        // Ship about to fall through the floor
        state.ship.pos.y = 680.0;
        state.ship.vy = 900.0;

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(
            events,
            vec![
                GameEvent::GatePassed { score: 1 },
                GameEvent::Crashed {
                    cause: CrashCause::Floor,
                    score: 1
                }
            ]
        );
        assert_eq!(state.run.best, 1);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = new_state();
        tick(&mut state, &flap(), DT);
        // Park a gate right on top of the ship with the opening far below
        state.gates.gates_mut()[0] = Gate::new(100.0, 600);
        state.ship.pos.y = 360.0;
        state.ship.vy = 0.0;

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Crashed {
                cause: CrashCause::Gate { index: 0, .. },
                ..
            })
        ));
        assert!(!state.run.running);
    }

    #[test]
    fn test_best_survives_reset() {
        let mut state = new_state();
        tick(&mut state, &flap(), DT);
        state.run.add_point();
        state.run.add_point();
        tick(&mut state, &restart(), DT);
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.best, 2);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let inputs = [flap(), TickInput::default(), TickInput::default(), flap()];
        for _ in 0..40 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.gates.gates(), b.gates.gates());
        assert_eq!(a.run, b.run);
    }
}
