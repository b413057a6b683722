//! Gain Aggregator
//!
//! Combines per-modification gain formulas into aggregate horsepower and
//! torque deltas. The pipeline is:
//! 1. group active mods by category, ordered canonically within the
//!    category (largest base gain first) so a permuted selection
//!    aggregates identically
//! 2. apply per-category diminishing returns (the i-th mod in a category
//!    contributes `base × decay^(i-1)`)
//! 3. scale each category total once by the platform multiplier
//! 4. sum categories and clamp to the configured physical ceiling,
//!    rescaling the breakdown so it still sums to the clamped totals
//!
//! Decay is strictly per-category. Cross-category damping is an explicit
//! extension point, not an applied policy.

use serde::{Deserialize, Serialize};

use crate::catalog::{ModCategory, ModId, ModificationCatalog, RpmBand, UpliftShape};
use crate::error::{EngineError, Warning};
use crate::resolver::ActiveSet;
use crate::vehicle::{Aspiration, TunabilityTier, VehicleProfile};

/// Physical plausibility bounds for aggregate gains.
///
/// A guard against runaway stacking from catalog data errors, not a tuning
/// knob. Hitting a bound clamps the total and emits [`Warning::NumericBound`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainLimits {
    /// Maximum gain as a fraction of the stock figure (1.5 = +150%)
    pub max_gain_fraction: f64,
}

impl Default for GainLimits {
    fn default() -> Self {
        Self {
            max_gain_fraction: 1.5,
        }
    }
}

/// One modification's share of a category total, after decay and the
/// platform multiplier. Carries the band/shape so the dyno synthesizer can
/// place the uplift without going back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModContribution {
    pub id: ModId,
    pub name: String,
    pub hp: f64,
    pub tq: f64,
    pub rpm_band: RpmBand,
    pub shape: UpliftShape,
}

/// Per-category slice of the aggregate result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryContribution {
    pub category: ModCategory,
    pub hp: f64,
    pub tq: f64,
    pub weight_delta_lb: f64,
    pub grip_delta: f64,
    pub mods: Vec<ModContribution>,
}

/// Computed aggregate gains for one vehicle + active set + catalog version.
///
/// Ephemeral value object: a pure function of its inputs, never persisted
/// by the engine. Callers may cache it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainResult {
    pub stock_hp: f64,
    pub stock_tq: f64,
    pub hp_gain: f64,
    pub tq_gain: f64,
    /// Net curb weight change in pounds (negative = lighter)
    pub weight_delta_lb: f64,
    /// Net fractional lateral grip change
    pub grip_delta: f64,
    pub breakdown: Vec<CategoryContribution>,
    pub warnings: Vec<Warning>,
}

impl GainResult {
    /// Zero-gain result for an empty active set
    pub fn empty(vehicle: &VehicleProfile) -> Self {
        Self {
            stock_hp: vehicle.stock_hp,
            stock_tq: vehicle.stock_tq,
            hp_gain: 0.0,
            tq_gain: 0.0,
            weight_delta_lb: 0.0,
            grip_delta: 0.0,
            breakdown: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn modified_hp(&self) -> f64 {
        self.stock_hp + self.hp_gain
    }

    pub fn modified_tq(&self) -> f64 {
        self.stock_tq + self.tq_gain
    }

    /// Modified horsepower rounded for display; every consuming surface
    /// shows the same integer
    pub fn modified_hp_rounded(&self) -> i64 {
        self.modified_hp().round() as i64
    }

    pub fn modified_tq_rounded(&self) -> i64 {
        self.modified_tq().round() as i64
    }

    /// Per-mod contributions across all categories, in selection order
    /// within each category
    pub fn contributions(&self) -> impl Iterator<Item = &ModContribution> {
        self.breakdown.iter().flat_map(|c| c.mods.iter())
    }
}

/// Aggregate gains with default limits
pub fn compute_gains(
    vehicle: &VehicleProfile,
    active: &ActiveSet,
    catalog: &ModificationCatalog,
) -> Result<GainResult, EngineError> {
    compute_gains_with_limits(vehicle, active, catalog, GainLimits::default())
}

/// Aggregate gains with explicit bounds
pub fn compute_gains_with_limits(
    vehicle: &VehicleProfile,
    active: &ActiveSet,
    catalog: &ModificationCatalog,
    limits: GainLimits,
) -> Result<GainResult, EngineError> {
    vehicle.validate()?;

    if active.is_empty() {
        return Ok(GainResult::empty(vehicle));
    }

    let mut result = GainResult::empty(vehicle);

    for category in ModCategory::ALL {
        let decay = catalog.decay_for(category);
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(EngineError::invalid_input(
                "category_decay",
                format!("decay {decay} for {category} out of (0, 1]"),
            ));
        }
        let multiplier = platform_multiplier(vehicle.aspiration, vehicle.tier, category);

        let mut slice = CategoryContribution {
            category,
            hp: 0.0,
            tq: 0.0,
            weight_delta_lb: 0.0,
            grip_delta: 0.0,
            mods: Vec::new(),
        };

        // Collect the category's mods with their undecayed base gains,
        // then order canonically (largest base first, id tie-break) so a
        // permuted selection aggregates to the identical result.
        let mut bases = Vec::new();
        for id in active.iter() {
            let def = catalog.get(id).ok_or_else(|| {
                EngineError::invalid_input(
                    "active_set",
                    format!("modification '{id}' not in pinned catalog"),
                )
            })?;
            if def.category != category {
                continue;
            }
            let f = &def.formula;
            let base_hp = f.hp_flat + vehicle.stock_hp * f.hp_percent / 100.0;
            let base_tq = f.tq_flat + vehicle.stock_tq * f.hp_percent / 100.0;
            if !base_hp.is_finite() || !base_tq.is_finite() {
                return Err(EngineError::invalid_input(
                    "formula",
                    format!("non-finite base gain for '{id}'"),
                ));
            }
            bases.push((id.clone(), def, base_hp, base_tq));
        }
        bases.sort_by(|a, b| {
            b.2.total_cmp(&a.2)
                .then_with(|| b.3.total_cmp(&a.3))
                .then_with(|| a.0.cmp(&b.0))
        });

        for (index_in_category, (id, def, base_hp, base_tq)) in bases.into_iter().enumerate() {
            let f = &def.formula;
            let factor = decay.powi(index_in_category as i32);
            // The platform multiplier is a single linear scale on the
            // category total; folding it into each contribution keeps the
            // breakdown summing exactly to the totals.
            let hp = base_hp * factor * multiplier;
            let tq = base_tq * factor * multiplier;
            slice.hp += hp;
            slice.tq += tq;
            slice.grip_delta += f.grip_delta * factor;
            // Weight stacks linearly; removing two seats removes two seats.
            slice.weight_delta_lb += f.weight_delta_lb;

            slice.mods.push(ModContribution {
                id,
                name: def.name.clone(),
                hp,
                tq,
                rpm_band: f.rpm_band,
                shape: f.shape,
            });
        }

        if !slice.mods.is_empty() {
            result.hp_gain += slice.hp;
            result.tq_gain += slice.tq;
            result.weight_delta_lb += slice.weight_delta_lb;
            result.grip_delta += slice.grip_delta;
            result.breakdown.push(slice);
        }
    }

    if let Some(scale) = clamp_total(
        &mut result.hp_gain,
        vehicle.stock_hp * limits.max_gain_fraction,
        "hp_gain",
        &mut result.warnings,
    ) {
        for slice in &mut result.breakdown {
            slice.hp *= scale;
            for m in &mut slice.mods {
                m.hp *= scale;
            }
        }
    }
    if let Some(scale) = clamp_total(
        &mut result.tq_gain,
        vehicle.stock_tq * limits.max_gain_fraction,
        "tq_gain",
        &mut result.warnings,
    ) {
        for slice in &mut result.breakdown {
            slice.tq *= scale;
            for m in &mut slice.mods {
                m.tq *= scale;
            }
        }
    }

    tracing::debug!(
        hp_gain = result.hp_gain,
        tq_gain = result.tq_gain,
        mods = active.len(),
        "aggregated gains"
    );

    Ok(result)
}

/// Clamp a runaway total to its ceiling. Returns the scale factor the
/// caller must apply to the breakdown so per-mod contributions keep summing
/// to the total every surface displays.
fn clamp_total(
    total: &mut f64,
    ceiling: f64,
    quantity: &str,
    warnings: &mut Vec<Warning>,
) -> Option<f64> {
    if *total > ceiling {
        tracing::warn!(quantity, raw = *total, ceiling, "gain clamped to ceiling");
        warnings.push(Warning::NumericBound {
            quantity: quantity.to_string(),
            raw: *total,
            clamped: ceiling,
        });
        let scale = ceiling / *total;
        *total = ceiling;
        Some(scale)
    } else {
        None
    }
}

/// Platform multiplier applied once per category total.
///
/// Forced-induction gains scale up on already-boosted platforms and cap
/// down on naturally aspirated ones; combustion-only categories are zeroed
/// for electric vehicles. The tier factor only touches the categories a
/// platform's headroom actually constrains, so breathing mods on a
/// moderate-tier car pass through at exactly 1.0.
pub fn platform_multiplier(
    aspiration: Aspiration,
    tier: TunabilityTier,
    category: ModCategory,
) -> f64 {
    use Aspiration::*;
    use ModCategory::*;

    let archetype = match (category, aspiration) {
        (ForcedInduction, NaturallyAspirated) => 0.85,
        (ForcedInduction, Turbocharged) => 1.15,
        (ForcedInduction, Supercharged) => 1.10,
        (ForcedInduction, Electric) => 0.0,
        (Tune, NaturallyAspirated) => 0.90,
        (Tune, Turbocharged) => 1.25,
        (Tune, Supercharged) => 1.15,
        (Tune, Electric) => 1.05,
        (Intake | Exhaust | EngineInternal, Electric) => 0.0,
        _ => 1.0,
    };

    let tier_factor = if matches!(category, ForcedInduction | EngineInternal | Tune) {
        match tier {
            TunabilityTier::Limited => 0.85,
            TunabilityTier::Moderate => 1.0,
            TunabilityTier::High => 1.1,
            TunabilityTier::Extreme => 1.2,
        }
    } else {
        1.0
    };

    archetype * tier_factor
}
