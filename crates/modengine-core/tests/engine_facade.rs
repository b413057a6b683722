//! End-to-end tests through the PerformanceEngine facade

#[cfg(test)]
mod tests {
    use modengine_core::catalog::CatalogVersion;
    use modengine_core::demo::{demo_catalog, demo_coupe, demo_sedan, demo_tracks, DEMO_CATALOG_VERSION};
    use modengine_core::engine::PerformanceEngine;
    use modengine_core::error::{EngineError, Warning};
    use modengine_core::selection::{InstallStatus, InstalledModificationSet};
    use pretty_assertions::assert_eq;

    fn engine() -> PerformanceEngine {
        let mut engine = PerformanceEngine::new();
        engine.register_catalog(demo_catalog()).unwrap();
        engine
    }

    fn version() -> CatalogVersion {
        CatalogVersion::from(DEMO_CATALOG_VERSION)
    }

    #[test]
    fn all_surfaces_see_identical_numbers() {
        // build page, comparison page and share page all recompute the
        // same selection; the engine must hand every one of them the same
        // figures (second and third calls are served from cache)
        let engine = engine();
        let vehicle = demo_coupe();
        let selection = InstalledModificationSet::from_ids([
            "cold_air_intake",
            "cat_back_exhaust",
            "stage2_tune",
            "coilovers",
        ]);

        let build_page = engine.compute_gains(&vehicle, &selection, &version()).unwrap();
        let compare_page = engine.compute_gains(&vehicle, &selection, &version()).unwrap();
        let share_page = engine.compute_gains(&vehicle, &selection, &version()).unwrap();

        assert_eq!(build_page, compare_page);
        assert_eq!(compare_page, share_page);
        assert_eq!(
            build_page.modified_hp_rounded(),
            share_page.modified_hp_rounded()
        );
    }

    #[test]
    fn full_pipeline_from_selection_to_track_estimate() {
        let engine = engine();
        let vehicle = demo_sedan();
        let mut selection = InstalledModificationSet::new();
        selection.push("turbo_kit", InstallStatus::Installed);
        selection.push("stage2_tune", InstallStatus::Planned);
        selection.push("sticky_tires", InstallStatus::Installed);

        let gains = engine.compute_gains(&vehicle, &selection, &version()).unwrap();
        assert!(gains.hp_gain > 0.0);

        let curves = engine.synthesize_dyno(&vehicle, &gains).unwrap();
        assert!(curves.modified.peak_hp() > curves.stock.peak_hp());

        let track = demo_tracks().remove(0);
        let lap = engine.estimate_lap_time(&vehicle, &gains, &track).unwrap();
        assert!(lap.improvement_seconds > 0.0);

        let score = engine
            .score_tunability(&vehicle, &selection, &version())
            .unwrap();
        assert!(score.score < 85, "turbo kit should consume headroom");
    }

    #[test]
    fn status_is_metadata_not_a_filter() {
        let engine = engine();
        let vehicle = demo_coupe();
        let mut planned = InstalledModificationSet::new();
        planned.push("cat_back_exhaust", InstallStatus::Planned);
        let installed = {
            let mut s = InstalledModificationSet::new();
            s.push("cat_back_exhaust", InstallStatus::Installed);
            s
        };
        let a = engine.compute_gains(&vehicle, &planned, &version()).unwrap();
        let b = engine.compute_gains(&vehicle, &installed, &version()).unwrap();
        assert_eq!(a.hp_gain, b.hp_gain);
    }

    #[test]
    fn installed_only_view_supports_as_built_figures() {
        let engine = engine();
        let vehicle = demo_coupe();
        let mut selection = InstalledModificationSet::new();
        selection.push("cold_air_intake", InstallStatus::Installed);
        selection.push("turbo_kit", InstallStatus::Planned);

        let full = engine.compute_gains(&vehicle, &selection, &version()).unwrap();
        let as_built = engine
            .compute_gains(&vehicle, &selection.installed_only(), &version())
            .unwrap();
        assert!(as_built.hp_gain < full.hp_gain);
    }

    #[test]
    fn historical_results_stay_pinned_to_their_catalog_version() {
        let mut engine = PerformanceEngine::new();
        engine.register_catalog(demo_catalog()).unwrap();

        // a revised catalog ships a stronger intake
        let mut revised = demo_catalog();
        revised.version = CatalogVersion::from("demo-2026.2");
        if let Some(cai) = revised
            .mods
            .get_mut(&modengine_core::catalog::ModId::from("cold_air_intake"))
        {
            cai.formula.hp_flat = 20.0;
        }
        engine.register_catalog(revised).unwrap();

        let vehicle = demo_coupe();
        let selection = InstalledModificationSet::from_ids(["cold_air_intake"]);
        let old = engine.compute_gains(&vehicle, &selection, &version()).unwrap();
        let new = engine
            .compute_gains(&vehicle, &selection, &CatalogVersion::from("demo-2026.2"))
            .unwrap();
        assert_eq!(old.hp_gain, 15.0);
        assert_eq!(new.hp_gain, 20.0);
    }

    #[test]
    fn unknown_catalog_version_is_a_typed_error() {
        let engine = engine();
        let err = engine
            .compute_gains(
                &demo_coupe(),
                &InstalledModificationSet::new(),
                &CatalogVersion::from("never-registered"),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCatalogVersion(_)));
    }

    #[test]
    fn diagnostics_surface_reports_non_blocking_badges() {
        let engine = engine();
        let vehicle = demo_coupe();
        // stage2 tune without its supporting mods, plus a typo'd id
        let selection = InstalledModificationSet::from_ids(["stage2_tune", "cold_air_intaek"]);
        let result = engine.compute_gains(&vehicle, &selection, &version()).unwrap();

        let warnings = engine.diagnostics(&result);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::UnknownModification { .. })));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::Prerequisite { .. })));
        // warnings never blocked the computation
        assert!(result.hp_gain > 0.0);
    }
}
