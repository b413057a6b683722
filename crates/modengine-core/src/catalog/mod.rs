//! Modification Catalog
//!
//! The catalog is versioned reference data describing every modification the
//! platform knows about. A computation is always pinned to exactly one
//! catalog version so historical results stay reproducible after catalog
//! updates. Entries are fully validated when the catalog is loaded; the
//! computation path can assume well-formed numbers.

mod types;

pub use types::{
    GainFormula, ModCategory, ModId, ModificationDefinition, RpmBand, UpliftShape,
};

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Catalog schema version this engine build understands
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Opaque catalog version label (e.g. "2026.1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogVersion(String);

impl CatalogVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CatalogVersion {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete, validated modification catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModificationCatalog {
    /// Version label, pinned per computation
    pub version: CatalogVersion,
    /// Schema version; must match [`CATALOG_SCHEMA_VERSION`]
    pub schema_version: u32,
    /// When this catalog revision was published
    pub released: DateTime<Utc>,
    /// Per-category diminishing-returns decay, in (0, 1]
    #[serde(default = "default_category_decay")]
    pub category_decay: HashMap<ModCategory, f64>,
    /// All entries, keyed by id for O(1) lookup
    pub mods: HashMap<ModId, ModificationDefinition>,
}

/// Default decay constants, used when a catalog document omits a category.
///
/// Breathing mods overlap heavily so they decay fast; forced induction
/// stacks almost independently; added weight never diminishes.
fn default_category_decay() -> HashMap<ModCategory, f64> {
    let mut decay = HashMap::new();
    decay.insert(ModCategory::Intake, 0.85);
    decay.insert(ModCategory::Exhaust, 0.85);
    decay.insert(ModCategory::EngineInternal, 0.90);
    decay.insert(ModCategory::Tune, 0.75);
    decay.insert(ModCategory::ForcedInduction, 0.95);
    decay.insert(ModCategory::Suspension, 0.80);
    decay.insert(ModCategory::WheelsTires, 0.80);
    decay.insert(ModCategory::WeightReduction, 0.90);
    decay.insert(ModCategory::WeightAddition, 1.0);
    decay
}

impl ModificationCatalog {
    /// Create an empty catalog with default decay constants
    pub fn new(version: impl Into<CatalogVersion>, released: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            schema_version: CATALOG_SCHEMA_VERSION,
            released,
            category_decay: default_category_decay(),
            mods: HashMap::new(),
        }
    }

    /// Parse a catalog from its JSON document and validate every entry
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Add an entry; rejects duplicate ids
    pub fn insert(&mut self, def: ModificationDefinition) -> Result<(), CatalogError> {
        if self.mods.contains_key(&def.id) {
            return Err(CatalogError::DuplicateId(def.id.to_string()));
        }
        self.mods.insert(def.id.clone(), def);
        Ok(())
    }

    /// O(1) entry lookup
    pub fn get(&self, id: &ModId) -> Option<&ModificationDefinition> {
        self.mods.get(id)
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.mods.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Decay constant for a category; categories absent from the document
    /// fall back to 1.0 (no decay) after validation
    pub fn decay_for(&self, category: ModCategory) -> f64 {
        self.category_decay.get(&category).copied().unwrap_or(1.0)
    }

    /// Load-time validation of the whole document.
    ///
    /// Everything the computation path relies on is checked here: finite
    /// formula values, decay in range, no self-conflicts.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (category, decay) in &self.category_decay {
            if !decay.is_finite() || *decay <= 0.0 || *decay > 1.0 {
                return Err(CatalogError::InvalidDecay {
                    category: category.to_string(),
                    value: *decay,
                });
            }
        }
        for (id, def) in &self.mods {
            if def.id != *id {
                return Err(CatalogError::InvalidValueError {
                    mod_id: id.to_string(),
                    field: "id".to_string(),
                    message: format!("key '{id}' does not match entry id '{}'", def.id),
                });
            }
            for (field, value) in def.formula.numeric_fields() {
                if !value.is_finite() {
                    return Err(CatalogError::InvalidValueError {
                        mod_id: id.to_string(),
                        field: field.to_string(),
                        message: "must be a finite number".to_string(),
                    });
                }
            }
            let band = &def.formula.rpm_band;
            if !band.low.is_finite() || !band.high.is_finite() || band.low >= band.high {
                return Err(CatalogError::InvalidValueError {
                    mod_id: id.to_string(),
                    field: "rpm_band".to_string(),
                    message: format!("invalid band {:.0}..{:.0}", band.low, band.high),
                });
            }
            if def.conflicts_with.contains(id) {
                return Err(CatalogError::SelfConflict(id.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn empty_catalog() -> ModificationCatalog {
        ModificationCatalog::new("test-1", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn default_decays_are_in_range() {
        let catalog = empty_catalog();
        assert!(catalog.validate().is_ok());
        for cat in ModCategory::ALL {
            let d = catalog.decay_for(cat);
            assert!(d > 0.0 && d <= 1.0, "{cat} decay {d} out of range");
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut catalog = empty_catalog();
        let def = ModificationDefinition::new("cai", "Cold Air Intake", ModCategory::Intake);
        catalog.insert(def.clone()).unwrap();
        assert!(matches!(
            catalog.insert(def),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn rejects_nan_formula_values() {
        let mut catalog = empty_catalog();
        let mut def = ModificationDefinition::new("bad", "Bad Mod", ModCategory::Tune);
        def.formula.hp_flat = f64::NAN;
        catalog.insert(def).unwrap();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidValueError { .. })
        ));
    }

    #[test]
    fn rejects_self_conflict() {
        let mut catalog = empty_catalog();
        let mut def = ModificationDefinition::new("turbo", "Turbo Kit", ModCategory::ForcedInduction);
        def.conflicts_with.push(ModId::from("turbo"));
        catalog.insert(def).unwrap();
        assert!(matches!(catalog.validate(), Err(CatalogError::SelfConflict(_))));
    }

    #[test]
    fn rejects_inverted_rpm_band() {
        let mut catalog = empty_catalog();
        let mut def = ModificationDefinition::new("weird", "Weird Band", ModCategory::Tune);
        def.formula.rpm_band = RpmBand::new(6000.0, 3000.0);
        catalog.insert(def).unwrap();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn parses_minimal_json_document() {
        let json = r#"{
            "version": "2026.1",
            "schema_version": 1,
            "released": "2026-01-15T00:00:00Z",
            "mods": {
                "cat_back_exhaust": {
                    "id": "cat_back_exhaust",
                    "name": "Cat-back Exhaust",
                    "category": "exhaust",
                    "formula": { "hp_flat": 12.0, "tq_flat": 10.0 }
                }
            }
        }"#;
        let catalog = ModificationCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let def = catalog.get(&ModId::from("cat_back_exhaust")).unwrap();
        assert_eq!(def.formula.hp_flat, 12.0);
        assert_eq!(def.formula.shape, UpliftShape::Flat);
        // omitted decay table falls back to defaults
        assert_eq!(catalog.decay_for(ModCategory::Exhaust), 0.85);
    }
}
