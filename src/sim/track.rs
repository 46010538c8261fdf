//! Stadium track geometry
//!
//! Two circular lobes of radius `track_radius` sit at `±arc_center_x` and
//! overlap in the middle. Every derived angle and offset is computed once here
//! and shared by motion, collision and drawing so they cannot drift apart.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::ARC_ANGLE_1;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Derived track constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub track_radius: f64,
    pub track_width: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Inner edge angle where one lobe's inner edge meets the other's outer edge
    pub arc_angle_1: f64,
    /// Outer edge angle matching `arc_angle_1` at the same height
    pub arc_angle_2: f64,
    /// Where the two inner edges cross
    pub arc_angle_3: f64,
    /// Where the two outer edges cross
    pub arc_angle_4: f64,
    /// Horizontal offset of each lobe center from the origin
    pub arc_center_x: f64,
}

impl TrackGeometry {
    pub fn new(track_radius: f64, track_width: f64) -> Self {
        let inner_radius = track_radius - track_width;
        let outer_radius = track_radius + track_width;

        let arc_angle_1 = ARC_ANGLE_1;
        let delta_y = arc_angle_1.sin() * inner_radius;
        let arc_angle_2 = (delta_y / outer_radius).asin();

        let arc_center_x =
            (arc_angle_1.cos() * inner_radius + arc_angle_2.cos() * outer_radius) / 2.0;

        let arc_angle_3 = (arc_center_x / inner_radius).acos();
        let arc_angle_4 = (arc_center_x / outer_radius).acos();

        Self {
            track_radius,
            track_width,
            inner_radius,
            outer_radius,
            arc_angle_1,
            arc_angle_2,
            arc_angle_3,
            arc_angle_4,
            arc_center_x,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.track_radius, tuning.track_width)
    }

    /// All derived values are finite (trig ratios stayed inside [-1, 1])
    pub fn is_well_formed(&self) -> bool {
        [
            self.arc_angle_2,
            self.arc_angle_3,
            self.arc_angle_4,
            self.arc_center_x,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.inner_radius > 0.0
    }

    #[inline]
    pub fn left_lobe_center(&self) -> DVec2 {
        DVec2::new(-self.arc_center_x, 0.0)
    }

    #[inline]
    pub fn right_lobe_center(&self) -> DVec2 {
        DVec2::new(self.arc_center_x, 0.0)
    }

    /// Player centerline position; the player drives the left lobe
    #[inline]
    pub fn player_position(&self, total_angle: f64) -> DVec2 {
        polar_to_cartesian(self.left_lobe_center(), self.track_radius, total_angle)
    }

    /// Opponent centerline position; opponents drive the right lobe
    #[inline]
    pub fn opponent_position(&self, angle: f64) -> DVec2 {
        polar_to_cartesian(self.right_lobe_center(), self.track_radius, angle)
    }
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
