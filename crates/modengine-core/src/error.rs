//! Error and warning types for the calculation engine
//!
//! Fatal errors abort a single call and come back as a typed `Result`.
//! Warnings never abort anything: they accumulate during a computation and
//! are returned alongside the successful result so consuming surfaces can
//! render non-blocking badges.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ModId;

/// Fatal errors surfaced at the engine boundary
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Catalog schema mismatch: engine supports schema {expected}, catalog declares {found}")]
    CatalogVersionMismatch { expected: u32, found: u32 },

    #[error("No catalog registered for version '{0}'")]
    UnknownCatalogVersion(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl EngineError {
    /// Shorthand for the common invalid-input case
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading or validating a modification catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for '{field}' in modification '{mod_id}': {message}")]
    InvalidValueError {
        mod_id: String,
        field: String,
        message: String,
    },

    #[error("Invalid decay {value} for category {category}: must be in (0, 1]")]
    InvalidDecay { category: String, value: f64 },

    #[error("Modification '{0}' lists itself in its own conflict set")]
    SelfConflict(String),

    #[error("Duplicate modification id '{0}'")]
    DuplicateId(String),
}

/// Non-fatal conditions accumulated during a computation
///
/// Every variant is informational. The engine never blocks a selection;
/// it classifies and reports, and the calling surface decides how to
/// present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A selected id was not found in the pinned catalog and was dropped
    UnknownModification { id: ModId },
    /// A mutually-exclusive pair was resolved; `excluded` was deactivated
    /// because `winner` appeared later in the selection order
    Conflict { excluded: ModId, winner: ModId },
    /// A modification is active without its prerequisite; advisory only
    Prerequisite { modification: ModId, missing: ModId },
    /// An aggregate value exceeded the configured physical ceiling and was
    /// clamped down to it
    NumericBound {
        quantity: String,
        raw: f64,
        clamped: f64,
    },
}
