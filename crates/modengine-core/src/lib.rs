//! # ModEngine Core Library
//!
//! Deterministic performance-modification calculation engine for the
//! ModEngine build-planning platform.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Conflict/prerequisite resolution over an ordered modification selection
//! - Gain aggregation with per-category diminishing returns and platform
//!   multipliers
//! - Stock vs modified dyno curve synthesis on a shared RPM grid
//! - Per-track lap time estimation from power-to-weight and grip deltas
//! - An advisory tunability (headroom) score
//!
//! It is a pure computation core: no I/O, no persistence, no hidden state.
//! Every result is a function of its inputs and the pinned catalog version,
//! so the surfaces that consume it (build configuration, specs comparison,
//! dyno visualization, track estimation, shared builds) all display
//! identical numbers.
//!
//! ## Example
//!
//! ```rust
//! use modengine_core::prelude::*;
//!
//! let mut engine = PerformanceEngine::new();
//! engine.register_catalog(modengine_core::demo::demo_catalog())?;
//!
//! let vehicle = modengine_core::demo::demo_coupe();
//! let version = CatalogVersion::from(modengine_core::demo::DEMO_CATALOG_VERSION);
//! let selection =
//!     InstalledModificationSet::from_ids(["cold_air_intake", "cat_back_exhaust"]);
//!
//! let gains = engine.compute_gains(&vehicle, &selection, &version)?;
//! println!("+{:.1} hp -> {} hp", gains.hp_gain, gains.modified_hp_rounded());
//!
//! let curves = engine.synthesize_dyno(&vehicle, &gains)?;
//! assert_eq!(curves.stock.samples.len(), curves.modified.samples.len());
//! # Ok::<(), modengine_core::EngineError>(())
//! ```

pub mod cache;
pub mod catalog;
pub mod demo;
pub mod dyno;
pub mod engine;
pub mod error;
pub mod gains;
pub mod laptime;
pub mod resolver;
pub mod selection;
pub mod tunability;
pub mod vehicle;

pub use error::{CatalogError, EngineError, Warning};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{GainCache, GainCacheKey};
    pub use crate::catalog::{
        CatalogVersion, GainFormula, ModCategory, ModId, ModificationCatalog,
        ModificationDefinition, RpmBand, UpliftShape,
    };
    pub use crate::dyno::{DynoComparison, DynoCurve, DynoSample};
    pub use crate::engine::PerformanceEngine;
    pub use crate::error::{CatalogError, EngineError, Warning};
    pub use crate::gains::{GainLimits, GainResult};
    pub use crate::laptime::{LapTimeEstimate, TrackId, TrackProfile};
    pub use crate::resolver::ActiveSet;
    pub use crate::selection::{InstallStatus, InstalledModificationSet, SelectedMod};
    pub use crate::tunability::TunabilityScore;
    pub use crate::vehicle::{Aspiration, Drivetrain, TunabilityTier, VehicleId, VehicleProfile};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
