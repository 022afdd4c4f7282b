use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

/// Public identity of a utility: `{category}{1-based slot}`, e.g. `A1`.
///
/// Uniqueness is not implied by the convention alone (category `A` with
/// eleven slots and category `A1` with one slot both produce `A11`); the
/// registry rejects collisions when it is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UtilityId(String);

impl UtilityId {
    #[must_use]
    pub(crate) fn for_slot(category: &str, slot: usize) -> Self {
        Self(format!("{category}{}", slot + 1))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UtilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UtilityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UtilityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UtilityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UtilityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Dense position of a utility in registry creation order.
///
/// Only the registry hands these out, so every index is in bounds for the
/// registry (and anything sized from it) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtilityIndex(usize);

impl UtilityIndex {
    #[must_use]
    pub(crate) const fn new(value: usize) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for UtilityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dense position of a connection in graph creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionIndex(usize);

impl ConnectionIndex {
    #[must_use]
    pub(crate) const fn new(value: usize) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
