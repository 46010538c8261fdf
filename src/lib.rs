//! Oval Racer - A stadium-track arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track geometry, motion, collisions, game state)
//! - `renderer`: Scene description and Canvas2D drawing
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    use std::f64::consts::PI;

    /// Track centerline radius of each lobe
    pub const TRACK_RADIUS: f64 = 225.0;
    /// Half the drivable band (centerline ± width)
    pub const TRACK_WIDTH: f64 = 45.0;
    /// Where the inner edge of one lobe meets the other lobe's outer edge
    pub const ARC_ANGLE_1: f64 = PI / 3.0;

    /// Base angular speed (radians per millisecond)
    pub const BASE_SPEED: f64 = 0.0017;
    /// Player speed multiplier while accelerating
    pub const ACCELERATE_FACTOR: f64 = 2.0;
    /// Player speed multiplier while decelerating
    pub const DECELERATE_FACTOR: f64 = 0.5;
    /// Player starts on the far side of the left lobe
    pub const PLAYER_INITIAL_ANGLE: f64 = PI;

    /// Opponent speed multiplier ranges (min, max)
    pub const CAR_SPEED_RANGE: (f64, f64) = (1.0, 2.0);
    pub const TRUCK_SPEED_RANGE: (f64, f64) = (0.6, 1.5);

    /// Hit-zone offsets along the vehicle's heading
    pub const CAR_HIT_ZONE_OFFSETS: [f64; 2] = [15.0, -15.0];
    pub const TRUCK_HIT_ZONE_OFFSETS: [f64; 3] = [40.0, -40.0, 0.0];
    /// Two hit zones closer than this collide (strict)
    pub const COLLISION_DISTANCE: f64 = 40.0;

    /// One more opponent is allowed every this many laps
    pub const LAPS_PER_OPPONENT: u32 = 5;

    /// Vehicle paint colors (0xRRGGBB)
    pub const VEHICLE_COLORS: [u32; 3] = [0xa52523, 0xbdb638, 0x78b14b];
}

/// Wrap an angle into [-π, π)
#[inline]
pub fn wrap_angle(mut angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: DVec2, r: f64, theta: f64) -> DVec2 {
    center + DVec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - -PI).abs() < 1e-12);
        assert!((wrap_angle(-PI / 2.0) - -PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(5.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_polar_to_cartesian_offset_center() {
        let p = polar_to_cartesian(DVec2::new(-10.0, 0.0), 5.0, 0.0);
        assert!((p - DVec2::new(-5.0, 0.0)).length() < 1e-12);
    }
}
