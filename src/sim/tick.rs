//! Frame-driven simulation tick
//!
//! Core game loop: one call per animation frame with the frame timestamp.

use super::collision::detect_collision;
use super::state::{GameEvent, GamePhase, GameState, Player, laps_completed};

/// Held input flags for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Speed up (ArrowUp held)
    pub accelerate: bool,
    /// Slow down (ArrowDown held)
    pub decelerate: bool,
}

/// Whether another opponent may join with `laps` completed
///
/// The allowance is `(laps + 1) / laps_per_opponent` in whole opponents, so
/// the first one arrives when the fourth lap completes.
#[inline]
pub fn should_spawn(opponent_count: usize, laps: u32, laps_per_opponent: u32) -> bool {
    let allowed = (laps.saturating_add(1) / laps_per_opponent) as usize;
    opponent_count < allowed
}

/// Advance the game by the time elapsed since the previous frame
///
/// Does nothing unless the game is running. The first frame after a start
/// only records its timestamp.
pub fn tick(state: &mut GameState, input: &TickInput, timestamp: f64) {
    if state.phase != GamePhase::Running {
        return;
    }

    let Some(last) = state.last_timestamp else {
        state.last_timestamp = Some(timestamp);
        return;
    };

    let mut dt = timestamp - last;
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Frame clock went backwards ({} -> {}), skipping movement", last, timestamp);
        dt = 0.0;
    }

    // Player
    let speed = Player::speed(&state.tuning, input.accelerate, input.decelerate);
    state.player.advance(speed, dt);

    // Laps
    let laps = laps_completed(state.player.angle_moved);
    if laps != state.score {
        state.score = laps;
        state.events.push(GameEvent::LapsChanged { laps });
        log::info!("Lap {}", laps);
    }

    // Traffic grows with laps; spawned before moving so it moves this frame
    if should_spawn(state.opponents.len(), laps, state.tuning.laps_per_opponent) {
        state.spawn_opponent();
    }

    // Opponents
    let base_speed = state.tuning.base_speed;
    for opponent in &mut state.opponents {
        opponent.advance(base_speed, dt);
    }

    // Collisions
    if let Some(hit) = detect_collision(state) {
        state.phase = GamePhase::Halted;
        state.events.push(GameEvent::Collision {
            opponent_id: hit.opponent_id,
        });
        log::info!(
            "Collision with opponent #{} after {} laps",
            hit.opponent_id,
            state.score
        );
    }

    state.time_ticks += 1;
    state.last_timestamp = Some(timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::get_distance;
    use crate::sim::state::{Direction, VehicleKind};
    use std::f64::consts::{PI, TAU};

    /// Running state with its clock primed at t = 0
    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        tick(&mut state, &TickInput::default(), 0.0);
        state
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), 0.0);
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.player.angle_moved, 0.0);
        assert!(state.last_timestamp.is_none());
    }

    #[test]
    fn test_first_frame_only_primes() {
        let mut state = GameState::new(1);
        state.start();
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.last_timestamp, Some(1000.0));
        assert_eq!(state.player.angle_moved, 0.0);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &TickInput::default(), 1010.0);
        assert!((state.player.angle_moved - -0.017).abs() < 1e-12);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_accelerate_doubles_distance() {
        let mut slow = running(1);
        let mut fast = running(1);
        tick(&mut slow, &TickInput::default(), 100.0);
        tick(
            &mut fast,
            &TickInput {
                accelerate: true,
                ..Default::default()
            },
            100.0,
        );
        assert!((fast.player.angle_moved - 2.0 * slow.player.angle_moved).abs() < 1e-12);
    }

    #[test]
    fn test_backwards_clock_is_zero_delta() {
        let mut state = running(1);
        tick(&mut state, &TickInput::default(), -50.0);
        assert_eq!(state.player.angle_moved, 0.0);
        assert_eq!(state.last_timestamp, Some(-50.0));
    }

    #[test]
    fn test_spawn_gate() {
        for laps in 0..4 {
            assert!(!should_spawn(0, laps, 5), "laps {}", laps);
        }
        assert!(should_spawn(0, 4, 5));
        assert!(!should_spawn(1, 4, 5));
        assert!(!should_spawn(1, 8, 5));
        assert!(should_spawn(1, 9, 5));
    }

    #[test]
    fn test_one_lap_scores_without_traffic() {
        let mut state = running(3);
        // One revolution at base speed takes 2π / 0.0017 ms; split into frames
        let total = TAU / state.tuning.base_speed;
        let frames = 400;
        for i in 1..=frames {
            tick(&mut state, &TickInput::default(), total * i as f64 / frames as f64 + 1e-6);
        }
        assert_eq!(state.score, 1);
        assert!(state.opponents.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LapsChanged { laps: 1 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Collision { .. })));
    }

    #[test]
    fn test_fourth_lap_spawns_first_opponent() {
        let mut state = running(3);
        // Just short of four laps
        state.player.angle_moved = -4.0 * TAU + 0.01;
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.score, 3);
        assert!(state.opponents.is_empty());

        // Crossing into lap four opens the gate
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.score, 4);
        assert_eq!(state.opponents.len(), 1);
        let spawned = &state.opponents[0];
        // It already moved this frame
        assert_ne!(spawned.angle, crate::sim::state::Opponent::initial_angle(spawned.direction));
    }

    #[test]
    fn test_collision_halts_loop() {
        let mut state = running(5);
        let track = state.track;
        // Put the player where an opponent at π - θ shares its center
        let theta = (track.arc_center_x / track.track_radius).acos();
        state.player.angle_moved = theta - PI;
        state.push_opponent(VehicleKind::Car, Direction::CounterClockwise, 1.0, 0);
        state.opponents[0].angle = PI - theta;

        let p = state.player.position(&track);
        let o = state.opponents[0].position(&track);
        assert!(get_distance(p, o) < 39.0);

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Halted);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Collision { opponent_id: 1 })
        );

        // Frozen: further frames change nothing
        let frozen_player = state.player.angle_moved;
        let frozen_opponent = state.opponents[0].angle;
        tick(&mut state, &TickInput::default(), 50.0);
        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.player.angle_moved, frozen_player);
        assert_eq!(state.opponents[0].angle, frozen_opponent);

        // Reset then start brings it back
        state.reset();
        assert!(state.start());
        assert!(state.opponents.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed produce identical traffic
        let mut state1 = running(99999);
        let mut state2 = running(99999);
        state1.player.angle_moved = -20.0 * TAU;
        state2.player.angle_moved = -20.0 * TAU;

        let inputs = [
            TickInput {
                accelerate: true,
                ..Default::default()
            },
            TickInput {
                decelerate: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for (i, input) in inputs.iter().cycle().take(12).enumerate() {
            let t = 16.0 * (i + 1) as f64;
            tick(&mut state1, input, t);
            tick(&mut state2, input, t);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.opponents.len(), state2.opponents.len());
        for (a, b) in state1.opponents.iter().zip(&state2.opponents) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.angle, b.angle);
        }
    }
}
