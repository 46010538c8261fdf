//! Hit-zone collision detection
//!
//! Vehicles are approximated by a few sample points along their heading.
//! Two vehicles collide when any pair of samples is closer than the
//! collision distance. Cars carry two samples, trucks three.

use glam::DVec2;

use super::state::{Direction, GameState, Opponent, Player, VehicleKind};
use super::track::TrackGeometry;
use crate::consts::CAR_HIT_ZONE_OFFSETS;

/// A hit-zone sample point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZone {
    pub pos: DVec2,
    /// Signed offset from the vehicle center it was derived from
    pub offset: f64,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub opponent_id: u32,
    pub player_zone: HitZone,
    pub opponent_zone: HitZone,
}

/// Euclidean distance between two points
#[inline]
pub fn get_distance(a: DVec2, b: DVec2) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Point `distance` away from `center` along the heading for `angle` and `direction`
#[inline]
pub fn hit_zone_position(center: DVec2, angle: f64, direction: Direction, distance: f64) -> DVec2 {
    let heading = direction.heading(angle);
    DVec2::new(
        center.x + heading.cos() * distance,
        center.y + heading.sin() * distance,
    )
}

/// Sample points for a vehicle of `kind` at `center`
pub fn hit_zones(
    center: DVec2,
    angle: f64,
    direction: Direction,
    kind: VehicleKind,
) -> impl Iterator<Item = HitZone> {
    kind.hit_zone_offsets().iter().map(move |&offset| HitZone {
        pos: hit_zone_position(center, angle, direction, offset),
        offset,
    })
}

/// The player's two hit zones
pub fn player_hit_zones(player: &Player, track: &TrackGeometry) -> [HitZone; 2] {
    let center = player.position(track);
    let angle = player.total_angle();
    CAR_HIT_ZONE_OFFSETS.map(|offset| HitZone {
        pos: hit_zone_position(center, angle, player.direction(), offset),
        offset,
    })
}

/// An opponent's hit zones (two for cars, three for trucks)
pub fn opponent_hit_zones(
    opponent: &Opponent,
    track: &TrackGeometry,
) -> impl Iterator<Item = HitZone> {
    hit_zones(
        opponent.position(track),
        opponent.angle,
        opponent.direction,
        opponent.kind,
    )
}

/// Strictly closer than `threshold`; exactly at the threshold is a miss
#[inline]
pub fn zones_collide(a: DVec2, b: DVec2, threshold: f64) -> bool {
    get_distance(a, b) < threshold
}

/// First player/opponent zone pair closer than the collision distance
///
/// Opponents are checked in spawn order; for each, every player zone is
/// tested against every opponent zone and the first hit wins.
pub fn detect_collision(state: &GameState) -> Option<Collision> {
    let threshold = state.tuning.collision_distance;
    let player_zones = player_hit_zones(&state.player, &state.track);

    state.opponents.iter().find_map(|opponent| {
        let opponent_zones: Vec<HitZone> = opponent_hit_zones(opponent, &state.track).collect();
        player_zones.iter().find_map(|pz| {
            opponent_zones
                .iter()
                .find(|oz| zones_collide(pz.pos, oz.pos, threshold))
                .map(|oz| Collision {
                    opponent_id: opponent.id,
                    player_zone: *pz,
                    opponent_zone: *oz,
                })
        })
    })
}
