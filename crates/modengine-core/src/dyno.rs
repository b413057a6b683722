//! Dyno Curve Synthesizer
//!
//! Projects aggregate gains onto an RPM-indexed power/torque curve so the
//! visualization surfaces can show stock vs modified power delivery. Both
//! curves always share the same sampling grid and can be compared
//! point-by-point.
//!
//! When the vehicle has no measured baseline, one is estimated from peak
//! figures and an aspiration shape template (NA curves peak and taper,
//! turbo curves hold a midrange plateau) and flagged `estimated`.

use serde::{Deserialize, Serialize};

use crate::catalog::UpliftShape;
use crate::error::EngineError;
use crate::gains::GainResult;
use crate::vehicle::{Aspiration, VehicleProfile};

/// Shared sampling grid bounds, inclusive
pub const GRID_MIN_RPM: f64 = 1000.0;
pub const GRID_MAX_RPM: f64 = 7500.0;
/// Grid spacing in RPM
pub const GRID_STEP_RPM: f64 = 250.0;

/// HP = TQ × RPM / 5252
const HP_TQ_CROSSOVER: f64 = 5252.0;

/// One sampled point on a dyno curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynoSample {
    pub rpm: f64,
    pub hp: f64,
    pub tq: f64,
}

/// An RPM-indexed power/torque curve on the shared grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynoCurve {
    pub samples: Vec<DynoSample>,
    /// True when the baseline was synthesized from peak figures rather
    /// than measured
    pub estimated: bool,
}

impl DynoCurve {
    pub fn peak_hp(&self) -> f64 {
        self.samples.iter().map(|s| s.hp).fold(0.0, f64::max)
    }

    pub fn peak_tq(&self) -> f64 {
        self.samples.iter().map(|s| s.tq).fold(0.0, f64::max)
    }

    /// RPM at which horsepower peaks
    pub fn peak_hp_rpm(&self) -> f64 {
        self.samples
            .iter()
            .fold((0.0, 0.0), |(best_rpm, best_hp), s| {
                if s.hp > best_hp {
                    (s.rpm, s.hp)
                } else {
                    (best_rpm, best_hp)
                }
            })
            .0
    }
}

/// Stock and modified curves on an identical grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynoComparison {
    pub stock: DynoCurve,
    pub modified: DynoCurve,
}

/// The shared RPM sampling grid
pub fn rpm_grid() -> Vec<f64> {
    let mut grid = Vec::new();
    let mut rpm = GRID_MIN_RPM;
    while rpm <= GRID_MAX_RPM {
        grid.push(rpm);
        rpm += GRID_STEP_RPM;
    }
    grid
}

/// Synthesize stock and modified curves for a computed gain result.
///
/// Per active contribution, a localized uplift is placed over its
/// effective RPM band (flat for broad categories, Gaussian bump for
/// forced-induction and tune), the uplifts are summed onto the grid and
/// smoothed, and the result is added to the stock curve. Uplifts inherit
/// the sign of the contribution, so `modified >= stock` everywhere unless
/// the catalog models an explicit loss.
pub fn synthesize(
    vehicle: &VehicleProfile,
    gains: &GainResult,
) -> Result<DynoComparison, EngineError> {
    vehicle.validate()?;

    let grid = rpm_grid();
    let stock = match &vehicle.baseline_dyno {
        Some(samples) => resample_baseline(samples, &grid)?,
        None => synthesize_baseline(vehicle, &grid),
    };

    let mut hp_uplift = vec![0.0f64; grid.len()];
    let mut tq_uplift = vec![0.0f64; grid.len()];
    for contribution in gains.contributions() {
        let band = contribution.rpm_band;
        for (i, &rpm) in grid.iter().enumerate() {
            let weight = match contribution.shape {
                UpliftShape::Flat => {
                    if band.contains(rpm) {
                        1.0
                    } else {
                        0.0
                    }
                }
                UpliftShape::Gaussian => {
                    let sigma = (band.width() / 4.0).max(GRID_STEP_RPM);
                    let d = rpm - band.center();
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                }
            };
            hp_uplift[i] += contribution.hp * weight;
            tq_uplift[i] += contribution.tq * weight;
        }
    }

    // Smoothing the uplift (not the summed curve) removes band-edge steps
    // without ever pushing the modified curve below stock: the kernel is a
    // convex combination, so it preserves the sign of the uplift.
    smooth(&mut hp_uplift);
    smooth(&mut tq_uplift);

    let modified_samples: Vec<DynoSample> = stock
        .samples
        .iter()
        .zip(hp_uplift.iter().zip(tq_uplift.iter()))
        .map(|(s, (dhp, dtq))| DynoSample {
            rpm: s.rpm,
            hp: s.hp + dhp,
            tq: s.tq + dtq,
        })
        .collect();

    let estimated = stock.estimated;
    Ok(DynoComparison {
        modified: DynoCurve {
            samples: modified_samples,
            estimated,
        },
        stock,
    })
}

/// Three-point kernel, ends pinned
fn smooth(values: &mut [f64]) {
    if values.len() < 3 {
        return;
    }
    let snapshot = values.to_vec();
    for i in 1..values.len() - 1 {
        values[i] = 0.25 * snapshot[i - 1] + 0.5 * snapshot[i] + 0.25 * snapshot[i + 1];
    }
}

/// Linear resampling of a measured baseline onto the shared grid,
/// clamped at the ends
fn resample_baseline(samples: &[DynoSample], grid: &[f64]) -> Result<DynoCurve, EngineError> {
    if samples.len() < 2 {
        return Err(EngineError::invalid_input(
            "baseline_dyno",
            "needs at least two samples",
        ));
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.rpm.total_cmp(&b.rpm));

    let resampled = grid
        .iter()
        .map(|&rpm| {
            let (hp, tq) = interpolate(&sorted, rpm);
            DynoSample { rpm, hp, tq }
        })
        .collect();
    Ok(DynoCurve {
        samples: resampled,
        estimated: false,
    })
}

fn interpolate(sorted: &[DynoSample], rpm: f64) -> (f64, f64) {
    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    if rpm <= first.rpm {
        return (first.hp, first.tq);
    }
    if rpm >= last.rpm {
        return (last.hp, last.tq);
    }
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if rpm >= a.rpm && rpm <= b.rpm {
            let span = b.rpm - a.rpm;
            let t = if span > 0.0 { (rpm - a.rpm) / span } else { 0.0 };
            return (a.hp + (b.hp - a.hp) * t, a.tq + (b.tq - a.tq) * t);
        }
    }
    (last.hp, last.tq)
}

/// Generic baseline from peak figures and the aspiration shape template
fn synthesize_baseline(vehicle: &VehicleProfile, grid: &[f64]) -> DynoCurve {
    let span = GRID_MAX_RPM - GRID_MIN_RPM;

    // Torque template first, horsepower derived from it.
    let tq: Vec<f64> = grid
        .iter()
        .map(|&rpm| {
            let frac = (rpm - GRID_MIN_RPM) / span;
            vehicle.stock_tq * torque_shape(vehicle.aspiration, frac)
        })
        .collect();
    let hp_raw: Vec<f64> = grid
        .iter()
        .zip(tq.iter())
        .map(|(&rpm, &tq)| tq * rpm / HP_TQ_CROSSOVER)
        .collect();

    // Normalize so the curve's horsepower peak matches the stock rating.
    let hp_peak = hp_raw.iter().fold(0.0f64, |a, &b| a.max(b));
    let scale = if hp_peak > 0.0 {
        vehicle.stock_hp / hp_peak
    } else {
        1.0
    };

    let samples = grid
        .iter()
        .enumerate()
        .map(|(i, &rpm)| DynoSample {
            rpm,
            hp: hp_raw[i] * scale,
            tq: tq[i],
        })
        .collect();

    DynoCurve {
        samples,
        estimated: true,
    }
}

/// Normalized torque shape per aspiration archetype, over `frac` in [0, 1]
fn torque_shape(aspiration: Aspiration, frac: f64) -> f64 {
    match aspiration {
        // Builds to a peak around 55% of the range, tapers either side
        Aspiration::NaturallyAspirated => {
            let d = frac - 0.55;
            1.0 - 0.7 * d * d
        }
        // Quick spool, midrange plateau, top-end taper
        Aspiration::Turbocharged => {
            if frac < 0.25 {
                0.6 + 0.4 * (frac / 0.25)
            } else if frac <= 0.65 {
                1.0
            } else {
                1.0 - 0.2 * ((frac - 0.65) / 0.35)
            }
        }
        // Near-linear with the blower, slight top-end fade
        Aspiration::Supercharged => {
            if frac <= 0.7 {
                0.85 + 0.15 * (frac / 0.7)
            } else {
                1.0 - 0.08 * ((frac - 0.7) / 0.3)
            }
        }
        // Flat torque off the line, falling past base speed
        Aspiration::Electric => {
            if frac <= 0.4 {
                1.0
            } else {
                1.0 - 0.4 * ((frac - 0.4) / 0.6)
            }
        }
    }
}
