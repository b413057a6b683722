//! Catalog data types
//!
//! A catalog entry describes one purchasable/installable modification:
//! which category it belongs to, how it changes output, what it conflicts
//! with and what it expects to already be on the car. All formula values
//! are validated when the catalog is loaded, never at computation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vehicle::TunabilityTier;

/// Stable identifier for a catalog modification
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModId(String);

impl ModId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of modification categories
///
/// Per-category diminishing-returns decay and platform multipliers key off
/// this, so it is a tagged enum rather than a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModCategory {
    Intake,
    Exhaust,
    EngineInternal,
    Tune,
    ForcedInduction,
    Suspension,
    WheelsTires,
    WeightReduction,
    WeightAddition,
}

impl ModCategory {
    /// All categories, in display order
    pub const ALL: [ModCategory; 9] = [
        ModCategory::Intake,
        ModCategory::Exhaust,
        ModCategory::EngineInternal,
        ModCategory::Tune,
        ModCategory::ForcedInduction,
        ModCategory::Suspension,
        ModCategory::WheelsTires,
        ModCategory::WeightReduction,
        ModCategory::WeightAddition,
    ];

    /// Categories that eat into platform headroom fastest
    pub fn is_high_risk(self) -> bool {
        matches!(self, ModCategory::ForcedInduction | ModCategory::EngineInternal)
    }

    /// Categories whose effect is primarily chassis grip rather than power
    pub fn affects_grip(self) -> bool {
        matches!(self, ModCategory::Suspension | ModCategory::WheelsTires)
    }

    /// Human-readable label for UI badges
    pub fn label(self) -> &'static str {
        match self {
            ModCategory::Intake => "Intake",
            ModCategory::Exhaust => "Exhaust",
            ModCategory::EngineInternal => "Engine Internals",
            ModCategory::Tune => "Tune",
            ModCategory::ForcedInduction => "Forced Induction",
            ModCategory::Suspension => "Suspension",
            ModCategory::WheelsTires => "Wheels & Tires",
            ModCategory::WeightReduction => "Weight Reduction",
            ModCategory::WeightAddition => "Weight Addition",
        }
    }
}

impl fmt::Display for ModCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// RPM range over which a modification's uplift applies on the dyno curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpmBand {
    pub low: f64,
    pub high: f64,
}

impl RpmBand {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn center(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, rpm: f64) -> bool {
        rpm >= self.low && rpm <= self.high
    }
}

impl Default for RpmBand {
    /// Full usable rev range; broad mods default to this
    fn default() -> Self {
        Self {
            low: 1000.0,
            high: 7500.0,
        }
    }
}

/// Shape template for projecting a gain onto the dyno grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpliftShape {
    /// Even uplift across the effective band (intake, exhaust, weight)
    #[default]
    Flat,
    /// Bell-shaped bump centered on the band (forced induction, tune)
    Gaussian,
}

/// Validated gain formula parameters for one modification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainFormula {
    /// Flat horsepower added before decay/multipliers
    pub hp_flat: f64,
    /// Flat torque (lb-ft) added before decay/multipliers
    pub tq_flat: f64,
    /// Percentage of stock horsepower added (e.g. 7.0 = +7%)
    pub hp_percent: f64,
    /// Curb weight change in pounds; negative means weight removed
    pub weight_delta_lb: f64,
    /// Fractional lateral grip change (e.g. 0.05 = +5% grip)
    pub grip_delta: f64,
    /// RPM range the gain acts over
    pub rpm_band: RpmBand,
    /// How the gain is distributed across the band
    pub shape: UpliftShape,
}

impl Default for GainFormula {
    fn default() -> Self {
        Self {
            hp_flat: 0.0,
            tq_flat: 0.0,
            hp_percent: 0.0,
            weight_delta_lb: 0.0,
            grip_delta: 0.0,
            rpm_band: RpmBand::default(),
            shape: UpliftShape::Flat,
        }
    }
}

impl GainFormula {
    /// Fields checked for finiteness at catalog load time
    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("hp_flat", self.hp_flat),
            ("tq_flat", self.tq_flat),
            ("hp_percent", self.hp_percent),
            ("weight_delta_lb", self.weight_delta_lb),
            ("grip_delta", self.grip_delta),
        ]
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationDefinition {
    pub id: ModId,
    pub name: String,
    pub category: ModCategory,
    pub formula: GainFormula,
    /// Ids this modification cannot coexist with
    #[serde(default)]
    pub conflicts_with: Vec<ModId>,
    /// Ids expected to be installed alongside this one (advisory)
    #[serde(default)]
    pub requires: Vec<ModId>,
    /// Lowest platform tier this modification is sensible for (advisory)
    #[serde(default)]
    pub min_tier: TunabilityTier,
}

impl ModificationDefinition {
    /// Minimal entry with everything defaulted except identity
    pub fn new(id: impl Into<ModId>, name: impl Into<String>, category: ModCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            formula: GainFormula::default(),
            conflicts_with: Vec::new(),
            requires: Vec::new(),
            min_tier: TunabilityTier::Limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpm_band_geometry() {
        let band = RpmBand::new(3000.0, 5000.0);
        assert_eq!(band.center(), 4000.0);
        assert_eq!(band.width(), 2000.0);
        assert!(band.contains(3000.0));
        assert!(!band.contains(5001.0));
    }

    #[test]
    fn category_round_trips_through_serde() {
        for cat in ModCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            let back: ModCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(cat, back);
        }
    }

    #[test]
    fn high_risk_categories() {
        assert!(ModCategory::ForcedInduction.is_high_risk());
        assert!(ModCategory::EngineInternal.is_high_risk());
        assert!(!ModCategory::Exhaust.is_high_risk());
    }
}
