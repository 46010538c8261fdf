//! Arc outlines for the track islands and field
//!
//! An arc is a circle segment around one lobe center:
//! - center: lobe center (x offset only, lobes sit on the x axis)
//! - radius: inner, outer or centerline radius
//! - start, end: angular extent, walked clockwise or anticlockwise

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::track::TrackGeometry;
use crate::polar_to_cartesian;

/// A circle segment around a lobe center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackArc {
    pub center: DVec2,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    /// Walk from `start` to `end` with decreasing angle
    pub clockwise: bool,
}

impl TrackArc {
    pub fn new(center: DVec2, radius: f64, start: f64, end: f64, clockwise: bool) -> Self {
        Self {
            center,
            radius,
            start,
            end,
            clockwise,
        }
    }

    /// Full circle, used for the dashed centerline markings
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self::new(center, radius, 0.0, TAU, false)
    }

    /// Angle swept from start to end in the walking direction, in [0, 2π]
    pub fn sweep(&self) -> f64 {
        let raw = if self.clockwise {
            self.start - self.end
        } else {
            self.end - self.start
        };
        if (raw - TAU).abs() < 1e-12 {
            return TAU;
        }
        raw.rem_euclid(TAU)
    }

    pub fn start_point(&self) -> DVec2 {
        polar_to_cartesian(self.center, self.radius, self.start)
    }

    pub fn end_point(&self) -> DVec2 {
        polar_to_cartesian(self.center, self.radius, self.end)
    }

    /// Sample `num_points` points from start to end (inclusive)
    pub fn sample(&self, num_points: usize) -> Vec<DVec2> {
        let sweep = if self.clockwise { -self.sweep() } else { self.sweep() };

        (0..num_points)
            .map(|i| {
                let t = i as f64 / (num_points - 1).max(1) as f64;
                polar_to_cartesian(self.center, self.radius, self.start + t * sweep)
            })
            .collect()
    }
}

/// A closed outline made of arcs joined by straight segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub arcs: Vec<TrackArc>,
}

impl Outline {
    /// Polyline through all arcs in order; the shape closes back to the first point
    pub fn polyline(&self, points_per_arc: usize) -> Vec<DVec2> {
        self.arcs
            .iter()
            .flat_map(|arc| arc.sample(points_per_arc))
            .collect()
    }
}

/// Grass between the lobes left of the middle island
pub fn left_island(g: &TrackGeometry) -> Outline {
    Outline {
        arcs: vec![
            TrackArc::new(g.left_lobe_center(), g.inner_radius, g.arc_angle_1, -g.arc_angle_1, false),
            TrackArc::new(
                g.right_lobe_center(),
                g.outer_radius,
                PI + g.arc_angle_2,
                PI - g.arc_angle_2,
                true,
            ),
        ],
    }
}

/// Lens-shaped grass where both inner circles overlap
pub fn middle_island(g: &TrackGeometry) -> Outline {
    Outline {
        arcs: vec![
            TrackArc::new(g.left_lobe_center(), g.inner_radius, g.arc_angle_3, -g.arc_angle_3, true),
            TrackArc::new(
                g.right_lobe_center(),
                g.inner_radius,
                PI + g.arc_angle_3,
                PI - g.arc_angle_3,
                true,
            ),
        ],
    }
}

/// Mirror of the left island
pub fn right_island(g: &TrackGeometry) -> Outline {
    Outline {
        arcs: vec![
            TrackArc::new(
                g.right_lobe_center(),
                g.inner_radius,
                PI - g.arc_angle_1,
                PI + g.arc_angle_1,
                true,
            ),
            TrackArc::new(g.left_lobe_center(), g.outer_radius, -g.arc_angle_2, g.arc_angle_2, false),
        ],
    }
}

/// Outer boundary of the asphalt (the field surrounds it)
pub fn outer_boundary(g: &TrackGeometry) -> Outline {
    Outline {
        arcs: vec![
            TrackArc::new(g.left_lobe_center(), g.outer_radius, -g.arc_angle_4, g.arc_angle_4, true),
            TrackArc::new(
                g.right_lobe_center(),
                g.outer_radius,
                PI - g.arc_angle_4,
                PI + g.arc_angle_4,
                true,
            ),
        ],
    }
}

/// Dashed centerline circles, one per lobe
pub fn line_markings(g: &TrackGeometry) -> [TrackArc; 2] {
    [
        TrackArc::circle(g.left_lobe_center(), g.track_radius),
        TrackArc::circle(g.right_lobe_center(), g.track_radius),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_directions() {
        let ccw = TrackArc::new(DVec2::ZERO, 10.0, 0.0, PI / 2.0, false);
        assert!((ccw.sweep() - PI / 2.0).abs() < 1e-12);

        let cw = TrackArc::new(DVec2::ZERO, 10.0, 0.0, PI / 2.0, true);
        assert!((cw.sweep() - 3.0 * PI / 2.0).abs() < 1e-12);

        assert!((TrackArc::circle(DVec2::ZERO, 1.0).sweep() - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_sample_endpoints() {
        let arc = TrackArc::new(DVec2::new(5.0, 0.0), 10.0, PI / 3.0, -PI / 3.0, true);
        let pts = arc.sample(9);
        assert_eq!(pts.len(), 9);
        assert!((pts[0] - arc.start_point()).length() < 1e-9);
        assert!((pts[8] - arc.end_point()).length() < 1e-9);
        // Clockwise from 60° to -60° passes through 0°
        assert!((pts[4] - DVec2::new(15.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_middle_island_closes_on_y_axis() {
        let g = TrackGeometry::default();
        let island = middle_island(&g);
        // Each arc ends where the next one starts (inner circles cross at x = 0)
        let first = island.arcs[0];
        let second = island.arcs[1];
        assert!((first.end_point() - second.start_point()).length() < 1e-9);
        assert!((second.end_point() - first.start_point()).length() < 1e-9);
        assert!(first.start_point().x.abs() < 1e-9);
    }

    #[test]
    fn test_left_island_corners_meet() {
        let g = TrackGeometry::default();
        let island = left_island(&g);
        assert!((island.arcs[0].end_point() - island.arcs[1].start_point()).length() < 1e-9);
        assert!((island.arcs[1].end_point() - island.arcs[0].start_point()).length() < 1e-9);
    }

    #[test]
    fn test_polyline_length() {
        let g = TrackGeometry::default();
        assert_eq!(outer_boundary(&g).polyline(16).len(), 32);
        assert_eq!(line_markings(&g).len(), 2);
    }
}
