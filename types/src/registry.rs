//! Category registry: ordered stages and the utility slots they hold.
//!
//! Pure data, built once from trusted static configuration. Invariants are
//! enforced at construction time so an invalid registry is unrepresentable.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{UtilityId, UtilityIndex};

// ── Input ────────────────────────────────────────────────────

/// One stage as declared by configuration: a name and a slot count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategorySpec {
    pub name: String,
    pub utilities: usize,
}

impl CategorySpec {
    #[must_use]
    pub fn new(name: impl Into<String>, utilities: usize) -> Self {
        Self {
            name: name.into(),
            utilities,
        }
    }
}

// ── Validation errors ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry must contain at least one category")]
    Empty,
    #[error("category {index} has an empty name")]
    BlankName { index: usize },
    #[error("category name {name:?} is declared more than once")]
    DuplicateCategory { name: String },
    #[error("category {name:?} has no utilities")]
    EmptyCategory { name: String },
    #[error("utility id {id} is generated by both category {first:?} and category {second:?}")]
    DuplicateUtilityId {
        id: UtilityId,
        first: String,
        second: String,
    },
}

// ── Registry ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    utilities: Vec<UtilityIndex>,
}

impl Category {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Utilities of this category in creation order.
    #[must_use]
    pub fn utilities(&self) -> &[UtilityIndex] {
        &self.utilities
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utility {
    id: UtilityId,
    stage: usize,
    slot: usize,
}

impl Utility {
    #[must_use]
    pub fn id(&self) -> &UtilityId {
        &self.id
    }

    /// Index of the owning category in traversal order.
    #[must_use]
    pub const fn stage(&self) -> usize {
        self.stage
    }

    /// Zero-based position within the owning category.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }
}

/// Ordered stages and every utility identity they generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    utilities: Vec<Utility>,
    by_id: HashMap<UtilityId, UtilityIndex>,
}

impl CategoryRegistry {
    /// Build the registry, generating `{name}{slot}` ids in declaration order.
    pub fn build(specs: &[CategorySpec]) -> Result<Self, RegistryError> {
        if specs.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut names = HashSet::new();
        let mut categories = Vec::with_capacity(specs.len());
        let mut utilities = Vec::with_capacity(specs.iter().map(|s| s.utilities).sum());
        let mut by_id: HashMap<UtilityId, UtilityIndex> = HashMap::new();

        for (stage, spec) in specs.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(RegistryError::BlankName { index: stage });
            }
            if !names.insert(spec.name.as_str()) {
                return Err(RegistryError::DuplicateCategory {
                    name: spec.name.clone(),
                });
            }
            if spec.utilities == 0 {
                return Err(RegistryError::EmptyCategory {
                    name: spec.name.clone(),
                });
            }

            let mut members = Vec::with_capacity(spec.utilities);
            for slot in 0..spec.utilities {
                let id = UtilityId::for_slot(&spec.name, slot);
                let index = UtilityIndex::new(utilities.len());
                if let Some(existing) = by_id.get(&id) {
                    let owner: &Utility = &utilities[existing.get()];
                    return Err(RegistryError::DuplicateUtilityId {
                        id,
                        first: specs[owner.stage].name.clone(),
                        second: spec.name.clone(),
                    });
                }
                by_id.insert(id.clone(), index);
                utilities.push(Utility { id, stage, slot });
                members.push(index);
            }

            categories.push(Category {
                name: spec.name.clone(),
                utilities: members,
            });
        }

        Ok(Self {
            categories,
            utilities,
            by_id,
        })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of utilities across all stages.
    #[must_use]
    pub fn utility_count(&self) -> usize {
        self.utilities.len()
    }

    #[must_use]
    pub fn category(&self, stage: usize) -> Option<&Category> {
        self.categories.get(stage)
    }

    /// Utility ids of the named category in creation order.
    #[must_use]
    pub fn utilities_of(&self, category: &str) -> Option<Vec<&UtilityId>> {
        let category = self.categories.iter().find(|c| c.name == category)?;
        Some(
            category
                .utilities
                .iter()
                .map(|&index| self.id(index))
                .collect(),
        )
    }

    #[must_use]
    pub fn utility(&self, index: UtilityIndex) -> &Utility {
        &self.utilities[index.get()]
    }

    #[must_use]
    pub fn id(&self, index: UtilityIndex) -> &UtilityId {
        &self.utilities[index.get()].id
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<UtilityIndex> {
        self.by_id.get(id).copied()
    }

    /// All utilities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (UtilityIndex, &Utility)> {
        self.utilities
            .iter()
            .enumerate()
            .map(|(i, u)| (UtilityIndex::new(i), u))
    }

    /// Number of complete stage-respecting paths: the product of slot counts.
    ///
    /// `None` when the product does not fit in a `usize`.
    #[must_use]
    pub fn path_count(&self) -> Option<usize> {
        self.categories
            .iter()
            .try_fold(1usize, |acc, c| acc.checked_mul(c.utilities.len()))
    }
}
