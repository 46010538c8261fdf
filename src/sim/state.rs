//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`, so a game can be
//! replayed from its seed and snapshotted to JSON.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

use super::track::TrackGeometry;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start trigger
    Idle,
    /// Frame loop advancing
    Running,
    /// Collision happened, frozen until reset
    Halted,
}

/// Vehicle category; decides hit zones and body size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Car,
    Truck,
}

impl VehicleKind {
    /// Offsets of the hit-zone samples along the vehicle heading
    pub fn hit_zone_offsets(&self) -> &'static [f64] {
        match self {
            VehicleKind::Car => &CAR_HIT_ZONE_OFFSETS,
            VehicleKind::Truck => &TRUCK_HIT_ZONE_OFFSETS,
        }
    }

    /// Body footprint (length, width) for drawing
    pub fn body_size(&self) -> (f64, f64) {
        match self {
            VehicleKind::Car => (60.0, 30.0),
            VehicleKind::Truck => (100.0, 35.0),
        }
    }
}

/// Travel direction around a lobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Angle decreases over time
    Clockwise,
    /// Angle increases over time
    CounterClockwise,
}

impl Direction {
    /// Heading relative to the angular position (tangent to the lobe)
    #[inline]
    pub fn heading(&self, angle: f64) -> f64 {
        match self {
            Direction::Clockwise => angle - FRAC_PI_2,
            Direction::CounterClockwise => angle + FRAC_PI_2,
        }
    }

    /// Sign applied to angular movement
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Accumulated angle since reset (only ever decreases)
    pub angle_moved: f64,
    /// Index into `VEHICLE_COLORS`
    pub color_index: usize,
}

impl Player {
    pub fn new(color_index: usize) -> Self {
        Self {
            angle_moved: 0.0,
            color_index,
        }
    }

    /// Absolute angular position on the left lobe
    #[inline]
    pub fn total_angle(&self) -> f64 {
        PLAYER_INITIAL_ANGLE + self.angle_moved
    }

    /// The player always drives clockwise
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::Clockwise
    }

    pub fn heading(&self) -> f64 {
        self.direction().heading(self.total_angle())
    }

    pub fn position(&self, track: &TrackGeometry) -> DVec2 {
        track.player_position(self.total_angle())
    }

    /// Speed for the held input; accelerate wins over decelerate
    pub fn speed(tuning: &Tuning, accelerate: bool, decelerate: bool) -> f64 {
        if accelerate {
            tuning.base_speed * tuning.accelerate_factor
        } else if decelerate {
            tuning.base_speed * tuning.decelerate_factor
        } else {
            tuning.base_speed
        }
    }

    /// Advance by `speed * dt` (dt in milliseconds)
    pub fn advance(&mut self, speed: f64, dt: f64) {
        self.angle_moved -= speed * dt;
    }

    /// Full revolutions completed
    pub fn laps(&self) -> u32 {
        laps_completed(self.angle_moved)
    }
}

/// Completed laps for an accumulated angle
#[inline]
pub fn laps_completed(angle_moved: f64) -> u32 {
    (angle_moved.abs() / TAU).floor() as u32
}

/// A computer-controlled vehicle on the right lobe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opponent {
    pub id: u32,
    pub kind: VehicleKind,
    pub direction: Direction,
    /// Angular position on the right lobe
    pub angle: f64,
    /// Multiplier on the base speed
    pub speed: f64,
    /// Index into `VEHICLE_COLORS`
    pub color_index: usize,
}

impl Opponent {
    /// Opponents enter at the top (clockwise) or bottom (counter-clockwise) of their lobe
    pub fn initial_angle(direction: Direction) -> f64 {
        match direction {
            Direction::Clockwise => FRAC_PI_2,
            Direction::CounterClockwise => -FRAC_PI_2,
        }
    }

    pub fn heading(&self) -> f64 {
        self.direction.heading(self.angle)
    }

    pub fn position(&self, track: &TrackGeometry) -> DVec2 {
        track.opponent_position(self.angle)
    }

    /// Advance by `base_speed * dt * speed` in the travel direction
    pub fn advance(&mut self, base_speed: f64, dt: f64) {
        self.angle += self.direction.sign() * base_speed * dt * self.speed;
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Lap count changed (score display)
    LapsChanged { laps: u32 },
    OpponentSpawned { id: u32, kind: VehicleKind },
    /// Player hit an opponent; the game is now halted
    Collision { opponent_id: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance values in effect
    pub tuning: Tuning,
    /// Derived track constants, computed once
    pub track: TrackGeometry,
    pub phase: GamePhase,
    pub player: Player,
    /// Opponents in spawn order
    pub opponents: Vec<Opponent>,
    /// Laps completed (the displayed score)
    pub score: u32,
    /// Timestamp of the previous frame (ms); `None` until the first frame primes it
    pub last_timestamp: Option<f64>,
    /// Frames advanced since reset
    pub time_ticks: u64,
    /// Events not yet drained by the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state; `tuning` is assumed to be validated
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let track = TrackGeometry::from_tuning(&tuning);
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(rng.random_range(0..VEHICLE_COLORS.len()));

        Self {
            seed,
            tuning,
            track,
            phase: GamePhase::Idle,
            player,
            opponents: Vec::new(),
            score: 0,
            last_timestamp: None,
            time_ticks: 0,
            events: Vec::new(),
            rng,
            next_id: 1,
        }
    }

    /// Idle -> Running; ignored in any other phase
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        log::info!("Race started (seed {})", self.seed);
        true
    }

    /// Back to Idle with a clean track; the RNG stream continues
    pub fn reset(&mut self) {
        self.player.angle_moved = 0.0;
        self.score = 0;
        self.last_timestamp = None;
        self.time_ticks = 0;
        self.opponents.clear();
        self.events.clear();
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::LapsChanged { laps: 0 });
        log::info!("Race reset");
    }

    /// Allocate a new opponent ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an opponent with a random kind, direction, speed and color
    pub fn spawn_opponent(&mut self) -> &Opponent {
        let kind = if self.rng.random_bool(0.5) {
            VehicleKind::Car
        } else {
            VehicleKind::Truck
        };
        let direction = if self.rng.random_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        let (min, max) = self.tuning.speed_range(kind);
        let speed = self.rng.random_range(min..max);
        let color_index = self.rng.random_range(0..VEHICLE_COLORS.len());
        self.push_opponent(kind, direction, speed, color_index)
    }

    /// Add a specific opponent at its entry angle
    pub fn push_opponent(
        &mut self,
        kind: VehicleKind,
        direction: Direction,
        speed: f64,
        color_index: usize,
    ) -> &Opponent {
        let id = self.next_entity_id();
        self.opponents.push(Opponent {
            id,
            kind,
            direction,
            angle: Opponent::initial_angle(direction),
            speed,
            color_index,
        });
        self.events.push(GameEvent::OpponentSpawned { id, kind });
        log::debug!("Spawned {:?} #{} {:?} at x{:.2}", kind, id, direction, speed);
        &self.opponents[self.opponents.len() - 1]
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_halted(&self) -> bool {
        self.phase == GamePhase::Halted
    }
}
