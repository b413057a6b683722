//! Conflict/Synergy Resolver
//!
//! Turns a raw ordered selection into the active set the aggregator works
//! on. Three things happen here, all of them warning-producing and none of
//! them blocking:
//! - ids missing from the pinned catalog are dropped
//! - mutually-exclusive pairs are resolved last-selected-wins
//! - missing prerequisites are reported (advisory, never deactivating)
//!
//! Output is deterministic for a given input order; permuting entries that
//! do not conflict with each other cannot change the result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{ModId, ModificationCatalog};
use crate::error::Warning;
use crate::selection::InstalledModificationSet;

/// The post-resolution modification set, in selection order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActiveSet {
    ids: Vec<ModId>,
}

impl ActiveSet {
    pub fn ids(&self) -> &[ModId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModId> {
        self.ids.iter()
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids sorted lexicographically, the canonical form used as a cache key
    pub fn sorted_ids(&self) -> Vec<ModId> {
        let mut ids = self.ids.clone();
        ids.sort();
        ids
    }
}

/// Resolve a selection against a catalog.
///
/// Policy for mutual exclusion is last-selected-wins: the entry appearing
/// latest in the input order stays active and every earlier conflicting
/// entry is deactivated with a [`Warning::Conflict`]. The conflict relation
/// is treated as symmetric even when the catalog only lists it on one side.
pub fn resolve(
    selection: &InstalledModificationSet,
    catalog: &ModificationCatalog,
) -> (ActiveSet, Vec<Warning>) {
    let mut warnings = Vec::new();

    // Drop unknown ids, collapse duplicates to their last occurrence.
    let mut known: Vec<ModId> = Vec::with_capacity(selection.len());
    let mut seen_unknown: HashSet<ModId> = HashSet::new();
    for id in selection.ids() {
        if !catalog.contains(id) {
            if seen_unknown.insert(id.clone()) {
                tracing::warn!(mod_id = %id, "selection references unknown modification");
                warnings.push(Warning::UnknownModification { id: id.clone() });
            }
            continue;
        }
        if let Some(pos) = known.iter().position(|k| k == id) {
            known.remove(pos);
        }
        known.push(id.clone());
    }

    // Last-selected-wins over the symmetric conflict relation.
    let mut active: Vec<ModId> = Vec::with_capacity(known.len());
    for id in known {
        let mut kept = Vec::with_capacity(active.len());
        for prior in active {
            if conflicts(catalog, &prior, &id) {
                tracing::debug!(excluded = %prior, winner = %id, "conflict resolved");
                warnings.push(Warning::Conflict {
                    excluded: prior,
                    winner: id.clone(),
                });
            } else {
                kept.push(prior);
            }
        }
        active = kept;
        active.push(id);
    }

    // Prerequisites are advisory: report, keep active.
    for id in &active {
        let Some(def) = catalog.get(id) else { continue };
        for required in &def.requires {
            if !active.contains(required) {
                warnings.push(Warning::Prerequisite {
                    modification: id.clone(),
                    missing: required.clone(),
                });
            }
        }
    }

    (ActiveSet { ids: active }, warnings)
}

fn conflicts(catalog: &ModificationCatalog, a: &ModId, b: &ModId) -> bool {
    let a_lists_b = catalog
        .get(a)
        .is_some_and(|def| def.conflicts_with.contains(b));
    let b_lists_a = catalog
        .get(b)
        .is_some_and(|def| def.conflicts_with.contains(a));
    a_lists_b || b_lists_a
}
