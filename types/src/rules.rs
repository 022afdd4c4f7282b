//! Incompatibility rules: a trigger utility excludes a fixed set of others
//! for as long as it sits on the traversal path.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{CategoryRegistry, UtilityIndex};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("incompatibility rule names unknown trigger {trigger:?}")]
    UnknownTrigger { trigger: String },
    #[error("incompatibility rule for {trigger} excludes unknown utility {excluded:?}")]
    UnknownExcluded { trigger: String, excluded: String },
    #[error("incompatibility rule for {trigger} excludes itself")]
    SelfExclusion { trigger: String },
}

/// Resolved trigger → excluded mapping.
///
/// Asymmetric: `A excludes B` says nothing about `B`. Each excluded list keeps
/// declaration order with duplicates removed. Indices refer to the registry
/// the map was resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncompatibilityMap {
    rules: HashMap<UtilityIndex, Vec<UtilityIndex>>,
}

impl IncompatibilityMap {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve string-keyed rules against `registry`.
    ///
    /// Triggers with an empty excluded list are dropped.
    pub fn resolve<I, T, E, S>(registry: &CategoryRegistry, rules: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (T, E)>,
        T: AsRef<str>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved: HashMap<UtilityIndex, Vec<UtilityIndex>> = HashMap::new();

        for (trigger, excluded) in rules {
            let trigger = trigger.as_ref();
            let trigger_index =
                registry
                    .index_of(trigger)
                    .ok_or_else(|| RuleError::UnknownTrigger {
                        trigger: trigger.to_owned(),
                    })?;

            let entry = resolved.entry(trigger_index).or_default();
            let mut seen: HashSet<UtilityIndex> = entry.iter().copied().collect();
            for target in excluded {
                let target = target.as_ref();
                let target_index =
                    registry
                        .index_of(target)
                        .ok_or_else(|| RuleError::UnknownExcluded {
                            trigger: trigger.to_owned(),
                            excluded: target.to_owned(),
                        })?;
                if target_index == trigger_index {
                    return Err(RuleError::SelfExclusion {
                        trigger: trigger.to_owned(),
                    });
                }
                if seen.insert(target_index) {
                    entry.push(target_index);
                }
            }
        }

        resolved.retain(|_, excluded| !excluded.is_empty());
        Ok(Self { rules: resolved })
    }

    /// Utilities excluded while `trigger` is active; empty if it triggers nothing.
    #[must_use]
    pub fn excluded_by(&self, trigger: UtilityIndex) -> &[UtilityIndex] {
        self.rules.get(&trigger).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_trigger(&self, utility: UtilityIndex) -> bool {
        self.rules.contains_key(&utility)
    }

    /// Number of triggers carrying at least one exclusion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
