//! Vehicle reference data
//!
//! `VehicleProfile` is an immutable record owned by the external vehicle
//! reference store. The engine reads it, validates it at the boundary, and
//! never writes it back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dyno::DynoSample;
use crate::error::EngineError;

/// Stable vehicle identifier (never a display slug)
pub type VehicleId = Uuid;

/// Engine aspiration archetype
///
/// Drives both the platform gain multiplier and the shape template used
/// when no measured baseline dyno exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspiration {
    NaturallyAspirated,
    Turbocharged,
    Supercharged,
    Electric,
}

/// Drivetrain layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drivetrain {
    FrontWheelDrive,
    RearWheelDrive,
    AllWheelDrive,
}

/// How much safe modification headroom a platform ships with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TunabilityTier {
    #[default]
    Limited,
    Moderate,
    High,
    Extreme,
}

/// Immutable stock specification for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: VehicleId,
    pub name: String,
    /// Stock crank horsepower
    pub stock_hp: f64,
    /// Stock torque in lb-ft
    pub stock_tq: f64,
    /// Curb weight in pounds
    pub curb_weight_lb: f64,
    pub drivetrain: Drivetrain,
    pub aspiration: Aspiration,
    pub tier: TunabilityTier,
    /// Measured baseline curve, if the reference store has one.
    /// When absent the synthesizer estimates one from the archetype.
    #[serde(default)]
    pub baseline_dyno: Option<Vec<DynoSample>>,
}

impl VehicleProfile {
    /// Boundary validation: malformed reference data is fatal for the call
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("stock_hp", self.stock_hp),
            ("stock_tq", self.stock_tq),
            ("curb_weight_lb", self.curb_weight_lb),
        ] {
            if !value.is_finite() {
                return Err(EngineError::invalid_input(field, "must be a finite number"));
            }
            if value <= 0.0 {
                return Err(EngineError::invalid_input(field, "must be positive"));
            }
        }
        if let Some(samples) = &self.baseline_dyno {
            if samples.len() < 2 {
                return Err(EngineError::invalid_input(
                    "baseline_dyno",
                    "needs at least two samples",
                ));
            }
            for s in samples {
                if !s.rpm.is_finite() || !s.hp.is_finite() || !s.tq.is_finite() {
                    return Err(EngineError::invalid_input(
                        "baseline_dyno",
                        "samples must be finite",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Curb weight in kilograms, for the lap-time physics
    pub fn curb_weight_kg(&self) -> f64 {
        self.curb_weight_lb * 0.453_592
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupe() -> VehicleProfile {
        VehicleProfile {
            id: Uuid::from_u128(1),
            name: "Test Coupe".to_string(),
            stock_hp: 444.0,
            stock_tq: 480.0,
            curb_weight_lb: 3750.0,
            drivetrain: Drivetrain::RearWheelDrive,
            aspiration: Aspiration::NaturallyAspirated,
            tier: TunabilityTier::Moderate,
            baseline_dyno: None,
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(coupe().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_hp() {
        let mut v = coupe();
        v.stock_hp = 0.0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn rejects_nan_weight() {
        let mut v = coupe();
        v.curb_weight_lb = f64::NAN;
        assert!(v.validate().is_err());
    }

    #[test]
    fn tier_ordering_matches_headroom() {
        assert!(TunabilityTier::Limited < TunabilityTier::Extreme);
        assert!(TunabilityTier::Moderate < TunabilityTier::High);
    }
}
