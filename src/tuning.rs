//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so a build can be retuned
//! from a JSON blob without touching the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{TrackGeometry, VehicleKind};

/// Balance values for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lobe centerline radius
    pub track_radius: f64,
    /// Half-width of the drivable band
    pub track_width: f64,
    /// Base angular speed (radians per millisecond)
    pub base_speed: f64,
    pub accelerate_factor: f64,
    pub decelerate_factor: f64,
    /// Opponent speed multiplier range for cars
    pub car_speed: (f64, f64),
    /// Opponent speed multiplier range for trucks
    pub truck_speed: (f64, f64),
    /// Hit-zone distance threshold (strict less-than)
    pub collision_distance: f64,
    /// Laps required per additional opponent
    pub laps_per_opponent: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            track_radius: TRACK_RADIUS,
            track_width: TRACK_WIDTH,
            base_speed: BASE_SPEED,
            accelerate_factor: ACCELERATE_FACTOR,
            decelerate_factor: DECELERATE_FACTOR,
            car_speed: CAR_SPEED_RANGE,
            truck_speed: TRUCK_SPEED_RANGE,
            collision_distance: COLLISION_DISTANCE,
            laps_per_opponent: LAPS_PER_OPPONENT,
        }
    }
}

/// Why a tuning blob was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Parse(serde_json::Error),
    /// A value outside its usable range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {}", e),
            TuningError::Invalid { field, reason } => write!(f, "invalid tuning `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning blob (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the track trigonometry or the spawn math
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.track_radius.is_finite() && self.track_radius > 0.0) {
            return invalid("track_radius", "must be positive");
        }
        // Inner radius must stay positive or the asin/acos ratios leave [-1, 1]
        if !(self.track_width > 0.0 && self.track_width < self.track_radius) {
            return invalid("track_width", "must be positive and smaller than track_radius");
        }
        if !TrackGeometry::new(self.track_radius, self.track_width).is_well_formed() {
            return invalid("track_width", "lobes no longer overlap into a stadium track");
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return invalid("base_speed", "must be positive");
        }
        if !(self.accelerate_factor > 0.0 && self.decelerate_factor > 0.0) {
            return invalid("accelerate_factor", "speed factors must be positive");
        }
        for (field, (min, max)) in [("car_speed", self.car_speed), ("truck_speed", self.truck_speed)] {
            if !(min > 0.0 && min < max) {
                return invalid(field, "range must be positive with min < max");
            }
        }
        if !(self.collision_distance > 0.0) {
            return invalid("collision_distance", "must be positive");
        }
        if self.laps_per_opponent == 0 {
            return invalid("laps_per_opponent", "must be at least 1");
        }
        Ok(())
    }

    /// Speed multiplier range for an opponent kind
    pub fn speed_range(&self, kind: VehicleKind) -> (f64, f64) {
        match kind {
            VehicleKind::Car => self.car_speed,
            VehicleKind::Truck => self.truck_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_speed": 0.002 }"#).unwrap();
        assert_eq!(tuning.base_speed, 0.002);
        assert_eq!(tuning.track_radius, TRACK_RADIUS);
        assert_eq!(tuning.truck_speed, TRUCK_SPEED_RANGE);
    }

    #[test]
    fn test_from_json_rejects_wide_track() {
        let err = Tuning::from_json(r#"{ "track_width": 300.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "track_width", .. }));
    }

    #[test]
    fn test_degenerate_lobes_rejected() {
        // Inner radius 25 is smaller than the lobe offset, acos leaves its domain
        let tuning = Tuning {
            track_width: 200.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }

    #[test]
    fn test_inverted_speed_range_rejected() {
        let tuning = Tuning {
            car_speed: (2.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "car_speed", .. })
        ));
    }
}
