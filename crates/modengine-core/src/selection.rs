//! Installed modification sets
//!
//! The ordered list of modification ids a build has selected, with
//! per-entry install status. Owned by the external build-persistence
//! collaborator; the engine only reads it. Order matters only for the
//! conflict tie-break in the resolver — otherwise the set is semantically
//! unordered.

use serde::{Deserialize, Serialize};

use crate::catalog::ModId;

/// Where an entry is in its install lifecycle. Metadata only: every
/// selected entry participates in computation regardless of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    #[default]
    Planned,
    InProgress,
    Installed,
}

/// One entry in a build's selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMod {
    pub id: ModId,
    #[serde(default)]
    pub status: InstallStatus,
}

/// Ordered selection of modifications for one build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InstalledModificationSet {
    entries: Vec<SelectedMod>,
}

impl InstalledModificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from ids, all marked planned
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ModId>,
    {
        Self {
            entries: ids
                .into_iter()
                .map(|id| SelectedMod {
                    id: id.into(),
                    status: InstallStatus::Planned,
                })
                .collect(),
        }
    }

    /// Append an entry, preserving selection order
    pub fn push(&mut self, id: impl Into<ModId>, status: InstallStatus) {
        self.entries.push(SelectedMod {
            id: id.into(),
            status,
        });
    }

    pub fn entries(&self) -> &[SelectedMod] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Narrow to installed entries only, for "as built" figures
    pub fn installed_only(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.status == InstallStatus::Installed)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ids_preserves_order() {
        let set = InstalledModificationSet::from_ids(["a", "b", "c"]);
        let ids: Vec<&str> = set.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn installed_only_filters_by_status() {
        let mut set = InstalledModificationSet::new();
        set.push("a", InstallStatus::Installed);
        set.push("b", InstallStatus::Planned);
        set.push("c", InstallStatus::Installed);
        let built = set.installed_only();
        let ids: Vec<&str> = built.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
