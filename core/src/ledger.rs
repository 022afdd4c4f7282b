//! Reference-counted suppression state.
//!
//! A utility is suppressed while at least one open trigger scope excludes it.
//! Counts are only reachable through [`SuppressionLedger::increment`],
//! [`SuppressionLedger::decrement`] and the scope helpers built on them, and
//! scopes close in strict LIFO order.

use thiserror::Error;

use stagewalk_types::UtilityIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("utility {utility} released with no matching suppression")]
    Underflow { utility: UtilityIndex },
    #[error("scope for {found} closed while scope for {expected} is innermost")]
    ScopeOutOfOrder {
        expected: UtilityIndex,
        found: UtilityIndex,
    },
    #[error("scope for {trigger} closed with no scope open")]
    NoOpenScope { trigger: UtilityIndex },
}

/// Outcome of a single increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    /// Count moved 0 → 1; the utility just became suppressed.
    Suppressed,
    /// Another open scope already suppressed it.
    AlreadySuppressed,
}

/// Outcome of a single decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// Count moved 1 → 0; the utility is eligible and visible again.
    Restored,
    /// Some other open scope still holds it.
    StillSuppressed,
}

#[derive(Debug, Clone)]
struct OpenScope {
    trigger: UtilityIndex,
    excluded: Vec<UtilityIndex>,
}

#[derive(Debug, Clone)]
pub struct SuppressionLedger {
    counts: Vec<u32>,
    scopes: Vec<OpenScope>,
    peak: u32,
}

impl SuppressionLedger {
    /// A ledger with every count at zero, sized for `utility_count` utilities.
    #[must_use]
    pub fn new(utility_count: usize) -> Self {
        Self {
            counts: vec![0; utility_count],
            scopes: Vec::new(),
            peak: 0,
        }
    }

    pub fn increment(&mut self, utility: UtilityIndex) -> Increment {
        let count = &mut self.counts[utility.get()];
        *count += 1;
        self.peak = self.peak.max(*count);
        if *count == 1 {
            Increment::Suppressed
        } else {
            Increment::AlreadySuppressed
        }
    }

    pub fn decrement(&mut self, utility: UtilityIndex) -> Result<Decrement, LedgerError> {
        let count = &mut self.counts[utility.get()];
        *count = count
            .checked_sub(1)
            .ok_or(LedgerError::Underflow { utility })?;
        if *count == 0 {
            Ok(Decrement::Restored)
        } else {
            Ok(Decrement::StillSuppressed)
        }
    }

    #[must_use]
    pub fn is_active(&self, utility: UtilityIndex) -> bool {
        self.counts[utility.get()] > 0
    }

    #[must_use]
    pub fn count(&self, utility: UtilityIndex) -> u32 {
        self.counts[utility.get()]
    }

    /// Highest count any utility reached since the ledger was created.
    #[must_use]
    pub fn peak(&self) -> u32 {
        self.peak
    }

    #[must_use]
    pub fn open_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// No scope open and every count back at zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.scopes.is_empty() && self.counts.iter().all(|&c| c == 0)
    }

    /// Increment every utility `trigger` excludes and push its scope.
    ///
    /// Returns the utilities that just became suppressed, in `excluded` order.
    pub fn open_scope(
        &mut self,
        trigger: UtilityIndex,
        excluded: &[UtilityIndex],
    ) -> Vec<UtilityIndex> {
        let newly_suppressed = excluded
            .iter()
            .copied()
            .filter(|&utility| self.increment(utility) == Increment::Suppressed)
            .collect();
        self.scopes.push(OpenScope {
            trigger,
            excluded: excluded.to_vec(),
        });
        newly_suppressed
    }

    /// Pop the innermost scope, which must belong to `trigger`, and decrement
    /// everything it excluded.
    ///
    /// Returns the utilities that just became unsuppressed, in `excluded` order.
    pub fn close_scope(&mut self, trigger: UtilityIndex) -> Result<Vec<UtilityIndex>, LedgerError> {
        let expected = self
            .scopes
            .last()
            .map(|scope| scope.trigger)
            .ok_or(LedgerError::NoOpenScope { trigger })?;
        if expected != trigger {
            return Err(LedgerError::ScopeOutOfOrder {
                expected,
                found: trigger,
            });
        }
        let scope = self
            .scopes
            .pop()
            .ok_or(LedgerError::NoOpenScope { trigger })?;

        let mut restored = Vec::new();
        for utility in scope.excluded {
            if self.decrement(utility)? == Decrement::Restored {
                restored.push(utility);
            }
        }
        Ok(restored)
    }
}
