//! Engine facade
//!
//! `PerformanceEngine` is the surface the surrounding services call: a
//! registry of pinned catalog versions, the resolver-then-aggregator
//! pipeline, and the bounded memoization cache. Every method is
//! synchronous and takes `&self`; the only shared state is the cache,
//! which sits behind a mutex, so concurrent callers (a comparison view
//! computing several vehicles at once) are safe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::{GainCache, GainCacheKey, DEFAULT_GAIN_CACHE_CAPACITY};
use crate::catalog::{CatalogVersion, ModificationCatalog, CATALOG_SCHEMA_VERSION};
use crate::dyno::{self, DynoComparison};
use crate::error::{EngineError, Warning};
use crate::gains::{self, GainLimits, GainResult};
use crate::laptime::{self, LapTimeEstimate, TrackProfile};
use crate::resolver;
use crate::selection::InstalledModificationSet;
use crate::tunability::{self, TunabilityScore};
use crate::vehicle::VehicleProfile;

/// Pure computation facade over the resolver, aggregator, synthesizer,
/// estimator and scorer
pub struct PerformanceEngine {
    catalogs: HashMap<CatalogVersion, Arc<ModificationCatalog>>,
    cache: Mutex<GainCache>,
    limits: GainLimits,
}

impl Default for PerformanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceEngine {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_GAIN_CACHE_CAPACITY)
    }

    /// Engine with an explicit cache bound
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            catalogs: HashMap::new(),
            cache: Mutex::new(GainCache::new(capacity)),
            limits: GainLimits::default(),
        }
    }

    /// Override the physical gain ceiling
    pub fn with_limits(mut self, limits: GainLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Register a catalog version for use by later calls.
    ///
    /// Rejects catalogs built against a different schema and re-runs full
    /// validation so the computation path never sees malformed entries.
    pub fn register_catalog(&mut self, catalog: ModificationCatalog) -> Result<(), EngineError> {
        if catalog.schema_version != CATALOG_SCHEMA_VERSION {
            return Err(EngineError::CatalogVersionMismatch {
                expected: CATALOG_SCHEMA_VERSION,
                found: catalog.schema_version,
            });
        }
        catalog.validate()?;
        tracing::debug!(version = %catalog.version, mods = catalog.len(), "registered catalog");
        self.catalogs
            .insert(catalog.version.clone(), Arc::new(catalog));
        Ok(())
    }

    /// The catalog pinned for a version, if registered
    pub fn catalog(&self, version: &CatalogVersion) -> Result<&Arc<ModificationCatalog>, EngineError> {
        self.catalogs
            .get(version)
            .ok_or_else(|| EngineError::UnknownCatalogVersion(version.to_string()))
    }

    /// Resolve a selection and aggregate its gains under the pinned
    /// catalog version.
    ///
    /// Aggregation is memoized on `(vehicle id, catalog version, sorted
    /// active ids)`; resolver warnings are recomputed per call and merged
    /// in front of the aggregation warnings, so a cache hit returns
    /// exactly what a fresh computation would.
    pub fn compute_gains(
        &self,
        vehicle: &VehicleProfile,
        selection: &InstalledModificationSet,
        version: &CatalogVersion,
    ) -> Result<GainResult, EngineError> {
        let catalog = self.catalog(version)?;
        let (active, resolver_warnings) = resolver::resolve(selection, catalog);

        let key = GainCacheKey::new(vehicle.id, version.clone(), active.sorted_ids());
        let cached = self.lock_cache().get(&key);
        let aggregated = match cached {
            Some(result) => result,
            None => {
                let result =
                    gains::compute_gains_with_limits(vehicle, &active, catalog, self.limits)?;
                self.lock_cache().insert(key, result.clone());
                result
            }
        };

        let mut result = aggregated;
        let mut warnings = resolver_warnings;
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        Ok(result)
    }

    /// Stock vs modified dyno curves for a computed gain result
    pub fn synthesize_dyno(
        &self,
        vehicle: &VehicleProfile,
        gains: &GainResult,
    ) -> Result<DynoComparison, EngineError> {
        dyno::synthesize(vehicle, gains)
    }

    /// Lap time estimate for a computed gain result on one track
    pub fn estimate_lap_time(
        &self,
        vehicle: &VehicleProfile,
        gains: &GainResult,
        track: &TrackProfile,
    ) -> Result<LapTimeEstimate, EngineError> {
        laptime::estimate(vehicle, gains, track)
    }

    /// Advisory headroom score for a selection under the pinned catalog
    pub fn score_tunability(
        &self,
        vehicle: &VehicleProfile,
        selection: &InstalledModificationSet,
        version: &CatalogVersion,
    ) -> Result<TunabilityScore, EngineError> {
        let catalog = self.catalog(version)?;
        let (active, _) = resolver::resolve(selection, catalog);
        tunability::score(vehicle, &active, catalog)
    }

    /// Diagnostics surface: the non-fatal warnings attached to a result,
    /// for non-blocking UI badges
    pub fn diagnostics<'a>(&self, result: &'a GainResult) -> &'a [Warning] {
        &result.warnings
    }

    /// Drop all memoized results (e.g. after reference data changes
    /// outside a catalog version bump)
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, GainCache> {
        // A poisoned lock only means another caller panicked mid-access;
        // the cache holds plain values, so recover the guard.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModCategory, ModId, ModificationDefinition};
    use crate::vehicle::{Aspiration, Drivetrain, TunabilityTier};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn vehicle() -> VehicleProfile {
        VehicleProfile {
            id: Uuid::from_u128(21),
            name: "Facade Car".to_string(),
            stock_hp: 444.0,
            stock_tq: 480.0,
            curb_weight_lb: 3750.0,
            drivetrain: Drivetrain::RearWheelDrive,
            aspiration: Aspiration::NaturallyAspirated,
            tier: TunabilityTier::Moderate,
            baseline_dyno: None,
        }
    }

    fn catalog() -> ModificationCatalog {
        let mut catalog = ModificationCatalog::new(
            "2026.1",
            Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
        );
        let mut cai =
            ModificationDefinition::new("cold_air_intake", "Cold Air Intake", ModCategory::Intake);
        cai.formula.hp_flat = 15.0;
        catalog.insert(cai).unwrap();
        catalog
    }

    fn engine() -> PerformanceEngine {
        let mut engine = PerformanceEngine::new();
        engine.register_catalog(catalog()).unwrap();
        engine
    }

    #[test]
    fn rejects_schema_mismatch() {
        let mut engine = PerformanceEngine::new();
        let mut bad = catalog();
        bad.schema_version = 99;
        assert!(matches!(
            engine.register_catalog(bad),
            Err(EngineError::CatalogVersionMismatch {
                expected: CATALOG_SCHEMA_VERSION,
                found: 99,
            })
        ));
    }

    #[test]
    fn unknown_version_is_fatal() {
        let engine = engine();
        let selection = InstalledModificationSet::from_ids(["cold_air_intake"]);
        let err = engine
            .compute_gains(&vehicle(), &selection, &CatalogVersion::from("1999.1"))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCatalogVersion(_)));
    }

    #[test]
    fn cache_hit_matches_fresh_computation() {
        let engine = engine();
        let v = vehicle();
        let version = CatalogVersion::from("2026.1");
        let selection = InstalledModificationSet::from_ids(["cold_air_intake", "nonsense_part"]);

        let first = engine.compute_gains(&v, &selection, &version).unwrap();
        let second = engine.compute_gains(&v, &selection, &version).unwrap();
        assert_eq!(first, second);
        // resolver warnings survive the cached path
        assert!(second
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::UnknownModification { id } if *id == ModId::from("nonsense_part"))));
    }

    #[test]
    fn diagnostics_exposes_result_warnings() {
        let engine = engine();
        let v = vehicle();
        let selection = InstalledModificationSet::from_ids(["missing_mod"]);
        let result = engine
            .compute_gains(&v, &selection, &CatalogVersion::from("2026.1"))
            .unwrap();
        assert_eq!(engine.diagnostics(&result), result.warnings.as_slice());
        assert_eq!(result.warnings.len(), 1);
    }
}
