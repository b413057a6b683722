//! Lap Time Estimator
//!
//! Physics-lite per-track time model. A track is decomposed into straight
//! length (time governed by power-to-weight against drag) and corner
//! length (time governed by lateral grip), plus an elevation term. Stock
//! and modified configurations are computed independently with the same
//! formula, so the improvement delta is a clean difference.
//!
//! The model is deliberately monotone: holding everything else equal, more
//! power-to-weight is never slower and more grip is never slower.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::gains::GainResult;
use crate::vehicle::VehicleProfile;

/// Stable track identifier
pub type TrackId = Uuid;

const G: f64 = 9.81;
const WATTS_PER_HP: f64 = 745.7;
const LB_TO_KG: f64 = 0.453_592;
/// Straight-line speed scale against the power-to-weight term
const STRAIGHT_SPEED_COEFF: f64 = 6.0;
/// Fraction of track length consumed per corner-per-km of density
const CORNER_LENGTH_FACTOR: f64 = 0.08;

/// Read-only track reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfile {
    pub id: TrackId,
    pub name: String,
    pub length_km: f64,
    /// Corners per kilometre
    pub corner_density: f64,
    /// Total elevation gain over a lap, metres
    pub elevation_gain_m: f64,
    /// Baseline surface grip coefficient (street tire ~ 0.9-1.1)
    pub grip_coefficient: f64,
}

impl TrackProfile {
    /// Boundary validation; missing or malformed track data is fatal and
    /// no partial estimate is returned
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("length_km", self.length_km),
            ("corner_density", self.corner_density),
            ("elevation_gain_m", self.elevation_gain_m),
            ("grip_coefficient", self.grip_coefficient),
        ] {
            if !value.is_finite() {
                return Err(EngineError::invalid_input(field, "must be a finite number"));
            }
        }
        if self.length_km <= 0.0 {
            return Err(EngineError::invalid_input("length_km", "must be positive"));
        }
        if self.corner_density < 0.0 {
            return Err(EngineError::invalid_input(
                "corner_density",
                "must be non-negative",
            ));
        }
        if self.grip_coefficient <= 0.0 {
            return Err(EngineError::invalid_input(
                "grip_coefficient",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Estimated lap times for one vehicle configuration pair on one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTimeEstimate {
    pub track_id: TrackId,
    pub stock_seconds: f64,
    pub modified_seconds: f64,
    /// Positive when the build is faster than stock
    pub improvement_seconds: f64,
}

/// Estimate stock vs modified lap time on a track
pub fn estimate(
    vehicle: &VehicleProfile,
    gains: &GainResult,
    track: &TrackProfile,
) -> Result<LapTimeEstimate, EngineError> {
    vehicle.validate()?;
    track.validate()?;

    let modified_weight_lb = vehicle.curb_weight_lb + gains.weight_delta_lb;
    if modified_weight_lb <= 0.0 {
        return Err(EngineError::invalid_input(
            "weight_delta_lb",
            "modified curb weight must stay positive",
        ));
    }
    let modified_grip = track.grip_coefficient * (1.0 + gains.grip_delta);
    if modified_grip <= 0.0 {
        return Err(EngineError::invalid_input(
            "grip_delta",
            "modified grip must stay positive",
        ));
    }

    let stock_seconds = lap_seconds(
        vehicle.stock_hp,
        vehicle.curb_weight_lb,
        track.grip_coefficient,
        track,
    )?;
    let modified_seconds = lap_seconds(
        gains.modified_hp(),
        modified_weight_lb,
        modified_grip,
        track,
    )?;

    Ok(LapTimeEstimate {
        track_id: track.id,
        stock_seconds,
        modified_seconds,
        improvement_seconds: stock_seconds - modified_seconds,
    })
}

/// Lap time for a single configuration
fn lap_seconds(
    hp: f64,
    weight_lb: f64,
    grip: f64,
    track: &TrackProfile,
) -> Result<f64, EngineError> {
    if hp <= 0.0 {
        return Err(EngineError::invalid_input("hp", "must be positive"));
    }
    let mass_kg = weight_lb * LB_TO_KG;
    let power_w = hp * WATTS_PER_HP;
    let power_to_weight = power_w / mass_kg;

    let length_m = track.length_km * 1000.0;
    let corner_fraction = (track.corner_density * CORNER_LENGTH_FACTOR).clamp(0.0, 0.7);
    let corner_m = length_m * corner_fraction;
    let straight_m = length_m - corner_m;

    // Straights: average speed grows sublinearly with power-to-weight,
    // standing in for drag and traction limits.
    let straight_speed = STRAIGHT_SPEED_COEFF * power_to_weight.powf(0.4);
    let mut seconds = straight_m / straight_speed;

    // Corners: steady-state lateral grip on an effective radius derived
    // from how tight the track is.
    if corner_m > 0.0 {
        let radius_m = (120.0 / track.corner_density).clamp(25.0, 200.0);
        let corner_speed = (grip * G * radius_m).sqrt();
        seconds += corner_m / corner_speed;
    }

    // Climbing costs energy at the rate power can supply it: t = mgh / P.
    if track.elevation_gain_m > 0.0 {
        seconds += track.elevation_gain_m * mass_kg * G / power_w;
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{Aspiration, Drivetrain, TunabilityTier};

    fn vehicle() -> VehicleProfile {
        VehicleProfile {
            id: Uuid::from_u128(9),
            name: "Lap Car".to_string(),
            stock_hp: 444.0,
            stock_tq: 480.0,
            curb_weight_lb: 3750.0,
            drivetrain: Drivetrain::RearWheelDrive,
            aspiration: Aspiration::NaturallyAspirated,
            tier: TunabilityTier::Moderate,
            baseline_dyno: None,
        }
    }

    fn track() -> TrackProfile {
        TrackProfile {
            id: Uuid::from_u128(100),
            name: "Test Circuit".to_string(),
            length_km: 4.0,
            corner_density: 4.0,
            elevation_gain_m: 30.0,
            grip_coefficient: 1.0,
        }
    }

    #[test]
    fn stock_equals_modified_with_no_gains() {
        let v = vehicle();
        let gains = GainResult::empty(&v);
        let est = estimate(&v, &gains, &track()).unwrap();
        assert_eq!(est.stock_seconds, est.modified_seconds);
        assert_eq!(est.improvement_seconds, 0.0);
    }

    #[test]
    fn more_power_is_never_slower() {
        let v = vehicle();
        let mut gains = GainResult::empty(&v);
        gains.hp_gain = 50.0;
        let est = estimate(&v, &gains, &track()).unwrap();
        assert!(est.improvement_seconds > 0.0);
        assert!(est.modified_seconds < est.stock_seconds);
    }

    #[test]
    fn more_grip_is_never_slower() {
        let v = vehicle();
        let mut gains = GainResult::empty(&v);
        gains.grip_delta = 0.08;
        let est = estimate(&v, &gains, &track()).unwrap();
        assert!(est.improvement_seconds > 0.0);
    }

    #[test]
    fn added_weight_with_no_power_is_a_regression() {
        let v = vehicle();
        let mut gains = GainResult::empty(&v);
        gains.weight_delta_lb = 150.0;
        let est = estimate(&v, &gains, &track()).unwrap();
        assert!(est.improvement_seconds < 0.0);
    }

    #[test]
    fn invalid_track_is_fatal_with_no_partial_result() {
        let v = vehicle();
        let gains = GainResult::empty(&v);
        let mut bad = track();
        bad.length_km = 0.0;
        assert!(matches!(
            estimate(&v, &gains, &bad),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn pure_straight_track_ignores_grip() {
        let v = vehicle();
        let mut gains = GainResult::empty(&v);
        gains.grip_delta = 0.5;
        let mut drag_strip = track();
        drag_strip.corner_density = 0.0;
        let est = estimate(&v, &gains, &drag_strip).unwrap();
        assert_eq!(est.improvement_seconds, 0.0);
    }

    #[test]
    fn lap_time_is_plausible() {
        let v = vehicle();
        let gains = GainResult::empty(&v);
        let est = estimate(&v, &gains, &track()).unwrap();
        // a 4 km circuit in a 444 hp coupe: somewhere between 1 and 4 minutes
        assert!(est.stock_seconds > 60.0 && est.stock_seconds < 240.0,
            "got {}", est.stock_seconds);
    }
}
