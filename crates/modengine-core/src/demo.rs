//! Demo reference data
//!
//! A small deterministic catalog plus sample vehicles and tracks for UI
//! work and tests without the external reference stores. Everything here
//! is fixed data: same ids, same numbers, every time.
//!
//! The demo catalog models intake and exhaust as distinct categories, so
//! stacking the Cold Air Intake (+15) with the Cat-back Exhaust (+12) on
//! the demo coupe adds the full 27 hp with no shared-category decay. Decay
//! between those two only kicks in for a catalog that files both under one
//! breathing category.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::catalog::{
    GainFormula, ModCategory, ModId, ModificationCatalog, ModificationDefinition, RpmBand,
    UpliftShape,
};
use crate::laptime::TrackProfile;
use crate::vehicle::{Aspiration, Drivetrain, TunabilityTier, VehicleProfile};

/// Version label of the built-in demo catalog
pub const DEMO_CATALOG_VERSION: &str = "demo-2026.1";

fn entry(
    id: &str,
    name: &str,
    category: ModCategory,
    formula: GainFormula,
) -> ModificationDefinition {
    let mut def = ModificationDefinition::new(id, name, category);
    def.formula = formula;
    def
}

/// The built-in demo catalog
pub fn demo_catalog() -> ModificationCatalog {
    let mut catalog = ModificationCatalog::new(
        DEMO_CATALOG_VERSION,
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
    );

    let mods = [
        entry(
            "cold_air_intake",
            "Cold Air Intake",
            ModCategory::Intake,
            GainFormula {
                hp_flat: 15.0,
                tq_flat: 8.0,
                rpm_band: RpmBand::new(3000.0, 7000.0),
                ..GainFormula::default()
            },
        ),
        entry(
            "cat_back_exhaust",
            "Cat-back Exhaust",
            ModCategory::Exhaust,
            GainFormula {
                hp_flat: 12.0,
                tq_flat: 10.0,
                rpm_band: RpmBand::new(2500.0, 7000.0),
                ..GainFormula::default()
            },
        ),
        entry(
            "long_tube_headers",
            "Long Tube Headers",
            ModCategory::Exhaust,
            GainFormula {
                hp_flat: 18.0,
                tq_flat: 14.0,
                rpm_band: RpmBand::new(3500.0, 7500.0),
                ..GainFormula::default()
            },
        ),
        entry(
            "stage1_tune",
            "Stage 1 Tune",
            ModCategory::Tune,
            GainFormula {
                hp_percent: 5.0,
                rpm_band: RpmBand::new(2500.0, 6500.0),
                shape: UpliftShape::Gaussian,
                ..GainFormula::default()
            },
        ),
        entry(
            "stage2_tune",
            "Stage 2 Tune",
            ModCategory::Tune,
            GainFormula {
                hp_percent: 9.0,
                rpm_band: RpmBand::new(3000.0, 6800.0),
                shape: UpliftShape::Gaussian,
                ..GainFormula::default()
            },
        ),
        entry(
            "supercharger_kit",
            "Supercharger Kit",
            ModCategory::ForcedInduction,
            GainFormula {
                hp_flat: 120.0,
                tq_flat: 100.0,
                rpm_band: RpmBand::new(2000.0, 7000.0),
                shape: UpliftShape::Gaussian,
                ..GainFormula::default()
            },
        ),
        entry(
            "turbo_kit",
            "Turbo Kit",
            ModCategory::ForcedInduction,
            GainFormula {
                hp_flat: 150.0,
                tq_flat: 130.0,
                rpm_band: RpmBand::new(3000.0, 6500.0),
                shape: UpliftShape::Gaussian,
                ..GainFormula::default()
            },
        ),
        entry(
            "forged_internals",
            "Forged Pistons & Rods",
            ModCategory::EngineInternal,
            GainFormula {
                rpm_band: RpmBand::new(5000.0, 7500.0),
                ..GainFormula::default()
            },
        ),
        entry(
            "coilovers",
            "Adjustable Coilovers",
            ModCategory::Suspension,
            GainFormula {
                grip_delta: 0.06,
                weight_delta_lb: -10.0,
                ..GainFormula::default()
            },
        ),
        entry(
            "sway_bars",
            "Sway Bar Set",
            ModCategory::Suspension,
            GainFormula {
                grip_delta: 0.03,
                ..GainFormula::default()
            },
        ),
        entry(
            "sticky_tires",
            "200TW Summer Tires",
            ModCategory::WheelsTires,
            GainFormula {
                grip_delta: 0.10,
                ..GainFormula::default()
            },
        ),
        entry(
            "lightweight_wheels",
            "Forged Wheels",
            ModCategory::WheelsTires,
            GainFormula {
                grip_delta: 0.02,
                weight_delta_lb: -40.0,
                ..GainFormula::default()
            },
        ),
        // Explicit loss: heavy show wheels add rotating mass.
        entry(
            "show_wheels",
            "Chrome Show Wheels",
            ModCategory::WheelsTires,
            GainFormula {
                hp_flat: -4.0,
                tq_flat: -3.0,
                weight_delta_lb: 30.0,
                ..GainFormula::default()
            },
        ),
        entry(
            "carbon_hood",
            "Carbon Fiber Hood",
            ModCategory::WeightReduction,
            GainFormula {
                weight_delta_lb: -25.0,
                ..GainFormula::default()
            },
        ),
        entry(
            "rear_seat_delete",
            "Rear Seat Delete",
            ModCategory::WeightReduction,
            GainFormula {
                weight_delta_lb: -60.0,
                ..GainFormula::default()
            },
        ),
        entry(
            "roll_cage",
            "Bolt-in Roll Cage",
            ModCategory::WeightAddition,
            GainFormula {
                weight_delta_lb: 80.0,
                ..GainFormula::default()
            },
        ),
    ];

    for def in mods {
        catalog
            .insert(def)
            .expect("demo catalog ids are unique by construction");
    }

    // Wire the relationships after the fact so the list above stays flat.
    if let Some(sc) = catalog.mods.get_mut(&ModId::from("supercharger_kit")) {
        sc.conflicts_with.push(ModId::from("turbo_kit"));
        sc.min_tier = TunabilityTier::High;
    }
    if let Some(turbo) = catalog.mods.get_mut(&ModId::from("turbo_kit")) {
        turbo.conflicts_with.push(ModId::from("supercharger_kit"));
        turbo.min_tier = TunabilityTier::High;
    }
    if let Some(tune2) = catalog.mods.get_mut(&ModId::from("stage2_tune")) {
        tune2.conflicts_with.push(ModId::from("stage1_tune"));
        tune2.requires.push(ModId::from("cold_air_intake"));
        tune2.requires.push(ModId::from("cat_back_exhaust"));
    }
    if let Some(tune1) = catalog.mods.get_mut(&ModId::from("stage1_tune")) {
        tune1.conflicts_with.push(ModId::from("stage2_tune"));
    }

    catalog
}

/// 444 hp / 480 lb-ft naturally aspirated coupe
pub fn demo_coupe() -> VehicleProfile {
    VehicleProfile {
        id: Uuid::from_u128(0xC0FFEE01),
        name: "GT Coupe".to_string(),
        stock_hp: 444.0,
        stock_tq: 480.0,
        curb_weight_lb: 3750.0,
        drivetrain: Drivetrain::RearWheelDrive,
        aspiration: Aspiration::NaturallyAspirated,
        tier: TunabilityTier::Moderate,
        baseline_dyno: None,
    }
}

/// Turbocharged AWD sedan with plenty of headroom
pub fn demo_sedan() -> VehicleProfile {
    VehicleProfile {
        id: Uuid::from_u128(0xC0FFEE02),
        name: "Turbo Sport Sedan".to_string(),
        stock_hp: 382.0,
        stock_tq: 368.0,
        curb_weight_lb: 3560.0,
        drivetrain: Drivetrain::AllWheelDrive,
        aspiration: Aspiration::Turbocharged,
        tier: TunabilityTier::High,
        baseline_dyno: None,
    }
}

/// Two sample tracks: a flowing road course and a tight club circuit
pub fn demo_tracks() -> Vec<TrackProfile> {
    vec![
        TrackProfile {
            id: Uuid::from_u128(0x7AC0_0001),
            name: "Willow Creek Raceway".to_string(),
            length_km: 4.2,
            corner_density: 3.3,
            elevation_gain_m: 40.0,
            grip_coefficient: 1.05,
        },
        TrackProfile {
            id: Uuid::from_u128(0x7AC0_0002),
            name: "Harbor Club Circuit".to_string(),
            length_km: 2.4,
            corner_density: 5.8,
            elevation_gain_m: 8.0,
            grip_coefficient: 0.95,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_validates() {
        let catalog = demo_catalog();
        assert!(catalog.validate().is_ok());
        assert!(catalog.len() >= 15);
    }

    #[test]
    fn forced_induction_conflict_is_mutual() {
        let catalog = demo_catalog();
        let sc = catalog.get(&ModId::from("supercharger_kit")).unwrap();
        let turbo = catalog.get(&ModId::from("turbo_kit")).unwrap();
        assert!(sc.conflicts_with.contains(&ModId::from("turbo_kit")));
        assert!(turbo.conflicts_with.contains(&ModId::from("supercharger_kit")));
    }

    #[test]
    fn demo_bolt_ons_stack_across_categories() {
        use crate::gains::compute_gains;
        use crate::resolver::resolve;
        use crate::selection::InstalledModificationSet;

        // intake and exhaust are separate demo categories, so no
        // shared-category decay applies between these two
        let catalog = demo_catalog();
        let selection =
            InstalledModificationSet::from_ids(["cold_air_intake", "cat_back_exhaust"]);
        let (active, warnings) = resolve(&selection, &catalog);
        assert!(warnings.is_empty());
        let result = compute_gains(&demo_coupe(), &active, &catalog).unwrap();
        assert!((result.hp_gain - 27.0).abs() < 1e-9, "got {}", result.hp_gain);
    }

    #[test]
    fn demo_data_is_deterministic() {
        assert_eq!(demo_coupe(), demo_coupe());
        assert_eq!(demo_tracks(), demo_tracks());
        let a = serde_json::to_string(&demo_catalog().version).unwrap();
        let b = serde_json::to_string(&demo_catalog().version).unwrap();
        assert_eq!(a, b);
    }
}
