//! Tunability Scorer
//!
//! Advisory 0-100 headroom score: how much safe modification potential a
//! platform has left given what is already on the car. Purely
//! informational; it never gates a selection, it only drives non-blocking
//! badges in consuming surfaces.

use serde::{Deserialize, Serialize};

use crate::catalog::ModificationCatalog;
use crate::error::EngineError;
use crate::resolver::ActiveSet;
use crate::vehicle::{Aspiration, TunabilityTier, VehicleProfile};

/// Advisory headroom score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunabilityScore {
    /// 0 (no safe headroom left) to 100 (untouched high-headroom platform)
    pub score: u8,
    /// Short label for UI badges
    pub label: String,
}

impl TunabilityScore {
    fn from_points(points: f64) -> Self {
        let score = points.clamp(0.0, 100.0).round() as u8;
        let label = match score {
            80..=100 => "Excellent headroom",
            60..=79 => "Solid headroom",
            40..=59 => "Limited headroom",
            _ => "Near the platform limit",
        };
        Self {
            score,
            label: label.to_string(),
        }
    }
}

/// Score remaining headroom for a vehicle with the given active set.
///
/// Base points come from the aspiration archetype and platform tier;
/// each active high-risk modification (forced induction, engine
/// internals) subtracts a fixed cost plus a term proportional to its
/// intensity relative to stock power.
pub fn score(
    vehicle: &VehicleProfile,
    active: &ActiveSet,
    catalog: &ModificationCatalog,
) -> Result<TunabilityScore, EngineError> {
    vehicle.validate()?;

    let base = match vehicle.aspiration {
        Aspiration::Turbocharged => 85.0,
        Aspiration::Supercharged => 75.0,
        Aspiration::NaturallyAspirated => 65.0,
        Aspiration::Electric => 40.0,
    };
    let tier_adjust = match vehicle.tier {
        TunabilityTier::Limited => -20.0,
        TunabilityTier::Moderate => 0.0,
        TunabilityTier::High => 5.0,
        TunabilityTier::Extreme => 10.0,
    };

    let mut points = base + tier_adjust;
    for id in active.iter() {
        let def = catalog.get(id).ok_or_else(|| {
            EngineError::invalid_input(
                "active_set",
                format!("modification '{id}' not in pinned catalog"),
            )
        })?;
        if !def.category.is_high_risk() {
            continue;
        }
        let intensity =
            (def.formula.hp_flat + vehicle.stock_hp * def.formula.hp_percent / 100.0).max(0.0)
                / vehicle.stock_hp;
        points -= 8.0 + 40.0 * intensity;
    }

    Ok(TunabilityScore::from_points(points))
}
