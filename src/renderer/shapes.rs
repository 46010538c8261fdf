//! Scene description for 2D drawing
//!
//! Turns simulation state into plain transforms and polylines so any
//! backend can draw a frame without reaching into the sim.

use glam::DVec2;

use crate::consts::VEHICLE_COLORS;
use crate::sim::arc::{self, TrackArc};
use crate::sim::collision::{opponent_hit_zones, player_hit_zones};
use crate::sim::{GameState, TrackGeometry, VehicleKind};
use crate::wrap_angle;

/// Where and how to draw one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleTransform {
    pub pos: DVec2,
    /// Heading in radians, wrapped to [-π, π)
    pub rotation: f64,
    pub kind: VehicleKind,
    /// 0xRRGGBB
    pub color: u32,
    pub is_player: bool,
}

/// Player first, then opponents in spawn order
pub fn frame_transforms(state: &GameState) -> Vec<VehicleTransform> {
    let mut transforms = Vec::with_capacity(state.opponents.len() + 1);

    transforms.push(VehicleTransform {
        pos: state.player.position(&state.track),
        rotation: wrap_angle(state.player.heading()),
        kind: VehicleKind::Car,
        color: VEHICLE_COLORS[state.player.color_index % VEHICLE_COLORS.len()],
        is_player: true,
    });

    transforms.extend(state.opponents.iter().map(|o| VehicleTransform {
        pos: o.position(&state.track),
        rotation: wrap_angle(o.heading()),
        kind: o.kind,
        color: VEHICLE_COLORS[o.color_index % VEHICLE_COLORS.len()],
        is_player: false,
    }));

    transforms
}

/// Body rectangle corners (front-left, front-right, back-right, back-left)
pub fn vehicle_corners(t: &VehicleTransform) -> [DVec2; 4] {
    let (length, width) = t.kind.body_size();
    let forward = DVec2::from_angle(t.rotation) * (length / 2.0);
    let left = forward.perp().normalize_or_zero() * (width / 2.0);

    [
        t.pos + forward + left,
        t.pos + forward - left,
        t.pos - forward - left,
        t.pos - forward + left,
    ]
}

/// All hit-zone sample points, for debug overlays
pub fn hit_zone_markers(state: &GameState) -> Vec<DVec2> {
    let mut points: Vec<DVec2> = player_hit_zones(&state.player, &state.track)
        .iter()
        .map(|z| z.pos)
        .collect();
    for opponent in &state.opponents {
        points.extend(opponent_hit_zones(opponent, &state.track).map(|z| z.pos));
    }
    points
}

/// CSS color string for a 0xRRGGBB value
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

/// Static track polylines, built once per game
#[derive(Debug, Clone)]
pub struct TrackScene {
    /// Grass islands inside the track
    pub islands: Vec<Vec<DVec2>>,
    /// Outer edge of the asphalt
    pub outer_boundary: Vec<DVec2>,
    /// Dashed centerline circles
    pub markings: Vec<TrackArc>,
}

impl TrackScene {
    pub fn new(track: &TrackGeometry, points_per_arc: usize) -> Self {
        Self {
            islands: vec![
                arc::left_island(track).polyline(points_per_arc),
                arc::middle_island(track).polyline(points_per_arc),
                arc::right_island(track).polyline(points_per_arc),
            ],
            outer_boundary: arc::outer_boundary(track).polyline(points_per_arc),
            markings: arc::line_markings(track).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, VehicleKind};
    use std::f64::consts::PI;

    #[test]
    fn test_player_transform_first() {
        let mut state = GameState::new(11);
        state.push_opponent(VehicleKind::Truck, Direction::Clockwise, 1.0, 2);
        let transforms = frame_transforms(&state);
        assert_eq!(transforms.len(), 2);
        assert!(transforms[0].is_player);
        assert_eq!(transforms[1].kind, VehicleKind::Truck);
        assert_eq!(transforms[1].color, VEHICLE_COLORS[2]);
        // Player starts at angle π facing up
        assert!((transforms[0].rotation - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_vehicle_corners_span_body() {
        let t = VehicleTransform {
            pos: DVec2::new(10.0, 0.0),
            rotation: 0.0,
            kind: VehicleKind::Car,
            color: 0,
            is_player: false,
        };
        let corners = vehicle_corners(&t);
        assert!((corners[0] - DVec2::new(40.0, 15.0)).length() < 1e-9);
        assert!((corners[2] - DVec2::new(-20.0, -15.0)).length() < 1e-9);
    }

    #[test]
    fn test_hit_zone_marker_count() {
        let mut state = GameState::new(11);
        state.push_opponent(VehicleKind::Truck, Direction::Clockwise, 1.0, 0);
        state.push_opponent(VehicleKind::Car, Direction::CounterClockwise, 1.0, 0);
        assert_eq!(hit_zone_markers(&state).len(), 2 + 3 + 2);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(0xa52523), "#a52523");
        assert_eq!(css_color(0x00000f), "#00000f");
    }

    #[test]
    fn test_track_scene_parts() {
        let scene = TrackScene::new(&TrackGeometry::default(), 24);
        assert_eq!(scene.islands.len(), 3);
        assert_eq!(scene.outer_boundary.len(), 48);
        assert_eq!(scene.markings.len(), 2);
    }
}
