//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the frame timestamp passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (opponents in spawn order)
//! - No rendering or platform dependencies

pub mod arc;
pub mod collision;
pub mod state;
pub mod tick;
pub mod track;

pub use arc::{Outline, TrackArc};
pub use collision::{Collision, HitZone, detect_collision, get_distance, zones_collide};
pub use state::{
    Direction, GameEvent, GamePhase, GameState, Opponent, Player, VehicleKind, laps_completed,
};
pub use tick::{TickInput, should_spawn, tick};
pub use track::TrackGeometry;
